//! Prime Capacity Planning
//!
//! Double hashing only visits every slot of a table when the table length is
//! prime: any step in `1..len` is then coprime with `len`, so repeatedly adding
//! the step (mod `len`) walks a full permutation of the slot indices before it
//! returns to the start.
//!
//! [`CapacityPlan`] turns a requested logical capacity into the two numbers the
//! probing table needs:
//!
//! - `physical`: the smallest prime `>= requested`, used as the slot array length
//! - `step_base`: the largest prime `< requested` (or `1` when there is none),
//!   used to derive the probe step
//!
//! ```text
//! requested │ physical │ step_base
//! ──────────┼──────────┼──────────
//!     1     │    2     │    1
//!     2     │    2     │    1
//!     3     │    3     │    2
//!     4     │    5     │    3
//!    10     │   11     │    7
//! ```

use crate::error::ForgetfulError;
use core::fmt;
use core::num::NonZeroUsize;

/// Returns `true` if `n` is prime.
///
/// Trial division up to and including `sqrt(n)`, so perfect squares of primes
/// (4, 9, 25, ...) are correctly rejected. `0` and `1` are not prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3usize;
    // `i <= n / i` is `i * i <= n` without the overflow
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Returns the smallest prime `>= n`, or `None` if it does not fit in `usize`.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}

/// Returns the largest prime strictly below `n`, searching down from `n - 1`.
///
/// Returns `1` when no prime exists in `[2, n - 1]`.
pub fn prev_prime(n: usize) -> usize {
    (2..n).rev().find(|&i| is_prime(i)).unwrap_or(1)
}

/// Physical sizing derived from a requested logical capacity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    requested: NonZeroUsize,
    physical: NonZeroUsize,
    step_base: NonZeroUsize,
}

impl CapacityPlan {
    /// Plans the table layout for `requested` logical entries.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::CapacityOverflow`] if no prime `>= requested`
    /// fits in `usize`.
    pub fn new(requested: NonZeroUsize) -> Result<Self, ForgetfulError> {
        let physical = next_prime(requested.get())
            .and_then(NonZeroUsize::new)
            .ok_or(ForgetfulError::CapacityOverflow {
                requested: requested.get(),
            })?;
        // prev_prime never returns 0
        let step_base = NonZeroUsize::new(prev_prime(requested.get())).unwrap_or(NonZeroUsize::MIN);

        Ok(CapacityPlan {
            requested,
            physical,
            step_base,
        })
    }

    /// The logical capacity: how many entries the table holds before it evicts.
    #[inline]
    pub fn requested(&self) -> NonZeroUsize {
        self.requested
    }

    /// The slot array length (always prime).
    #[inline]
    pub fn physical(&self) -> NonZeroUsize {
        self.physical
    }

    /// The prime the probe step is derived from.
    #[inline]
    pub fn step_base(&self) -> NonZeroUsize {
        self.step_base
    }

    /// Start index of the probe sequence for a raw hash.
    #[inline]
    pub(crate) fn start(&self, raw_hash: u64) -> usize {
        // The remainder is below `physical`, which is a usize.
        (raw_hash % self.physical.get() as u64) as usize
    }

    /// Probe step for a raw hash, always in `[1, step_base]`.
    #[inline]
    pub(crate) fn step(&self, raw_hash: u64) -> usize {
        let base = self.step_base.get();
        base - self.start(raw_hash) % base
    }

    /// Next index in the probe sequence.
    #[inline]
    pub(crate) fn advance(&self, index: usize, step: usize) -> usize {
        // index and step are both below `physical`, so one subtraction wraps
        let physical = self.physical.get();
        let room = physical - index;
        if step >= room {
            step - room
        } else {
            index + step
        }
    }
}

impl fmt::Debug for CapacityPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityPlan")
            .field("requested", &self.requested)
            .field("physical", &self.physical)
            .field("step_base", &self.step_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(n: usize) -> CapacityPlan {
        CapacityPlan::new(NonZeroUsize::new(n).unwrap()).unwrap()
    }

    #[test]
    fn test_is_prime_small_values() {
        let primes: Vec<usize> = (0..40).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]);
    }

    #[test]
    fn test_is_prime_rejects_prime_squares() {
        for p in [2usize, 3, 5, 7, 11, 13] {
            assert!(!is_prime(p * p), "{} should not be prime", p * p);
        }
    }

    #[test]
    fn test_is_prime_large() {
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(1_000_000_007 * 3));
        assert!(!is_prime(104_729 * 104_729));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), Some(2));
        assert_eq!(next_prime(1), Some(2));
        assert_eq!(next_prime(4), Some(5));
        assert_eq!(next_prime(5), Some(5));
        assert_eq!(next_prime(24), Some(29));
        assert_eq!(next_prime(usize::MAX), None);
    }

    #[test]
    fn test_prev_prime() {
        assert_eq!(prev_prime(0), 1);
        assert_eq!(prev_prime(2), 1);
        assert_eq!(prev_prime(3), 2);
        assert_eq!(prev_prime(4), 3);
        assert_eq!(prev_prime(11), 7);
        assert_eq!(prev_prime(12), 11);
    }

    #[test]
    fn test_plan_table() {
        let cases = [(1, 2, 1), (2, 2, 1), (3, 3, 2), (4, 5, 3), (9, 11, 7), (10, 11, 7)];
        for (requested, physical, step_base) in cases {
            let p = plan(requested);
            assert_eq!(p.requested().get(), requested);
            assert_eq!(p.physical().get(), physical, "physical for {}", requested);
            assert_eq!(p.step_base().get(), step_base, "step_base for {}", requested);
        }
    }

    #[test]
    fn test_plan_overflow() {
        let err = CapacityPlan::new(NonZeroUsize::MAX).unwrap_err();
        assert_eq!(
            err,
            ForgetfulError::CapacityOverflow {
                requested: usize::MAX
            }
        );
    }

    #[test]
    fn test_step_is_in_range() {
        let p = plan(10);
        for raw in 0..1000u64 {
            let step = p.step(raw);
            assert!(step >= 1 && step <= p.step_base().get());
            assert!(p.start(raw) < p.physical().get());
        }
    }

    #[test]
    fn test_probe_sequence_visits_every_slot() {
        for requested in 1..60 {
            let p = plan(requested);
            let len = p.physical().get();
            for raw in 0..(2 * len as u64) {
                let step = p.step(raw);
                let mut seen = vec![false; len];
                let mut index = p.start(raw);
                for _ in 0..len {
                    seen[index] = true;
                    index = p.advance(index, step);
                }
                assert!(seen.iter().all(|&s| s), "plan {:?} raw {}", p, raw);
                assert_eq!(index, p.start(raw));
            }
        }
    }
}
