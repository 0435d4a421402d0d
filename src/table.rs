//! Forgetful Probing Table
//!
//! A fixed-length open-addressing table that never grows. When the logical
//! capacity is reached, storing a new key evicts the entry with the lowest
//! access count instead of resizing.
//!
//! # Layout
//!
//! ```text
//! requested capacity 4  ──▶  physical length 5 (next prime), step base 3
//!
//!   index:   0        1        2        3        4
//!          ┌────────┬────────┬────────┬────────┬────────┐
//!          │ a  (2) │ empty  │ c  (0) │ b  (5) │ d  (1) │   (n) = access count
//!          └────────┴────────┴────────┴────────┴────────┘
//! ```
//!
//! # Probing
//!
//! Both probe parameters come from one raw hash `h` of the key:
//!
//! - start: `h mod physical`
//! - step:  `step_base - (start mod step_base)`
//!
//! The step lies in `[1, step_base]` and `step_base < physical`, and the
//! physical length is prime, so the sequence `start, start + step, ...`
//! (mod `physical`) reaches every slot.
//!
//! # Eviction
//!
//! Only runs when `len == capacity`. The victim is the occupied slot with the
//! lowest access count, ties going to the lowest index:
//!
//! 1. slot 0 with a count of zero is taken immediately
//! 2. otherwise the first slot from index 1 up with a count of zero is taken
//! 3. otherwise the first slot from index 0 up holding the minimum count is taken
//!
//! Empty slots never take part. The new entry replaces the victim in its
//! slot, so the length does not change.
//!
//! # Lookups
//!
//! `get` walks the probe sequence until it finds the key, reaches an empty
//! slot, or has examined `len` slots. An entry placed by eviction sits in its
//! victim's slot, which need not lie on its own probe sequence before the
//! first empty slot, so when the physical length exceeds the capacity such an
//! entry can be unreachable by `get`.

use crate::config::ForgetfulMapConfig;
use crate::entry::Entry;
use crate::error::ForgetfulError;
use crate::metrics::{CacheMetrics, ForgetfulMapMetrics};
use crate::prime::CapacityPlan;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use std::collections::BTreeMap;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// Logs and returns a boundary rejection.
pub(crate) fn reject(err: ForgetfulError) -> ForgetfulError {
    tracing::warn!(error = %err, "rejected absent argument");
    err
}

/// Single-threaded forgetful table.
///
/// This holds the whole algorithm. [`ForgetfulHashMap`](crate::ForgetfulHashMap)
/// puts one of these behind a lock.
///
/// # Examples
///
/// ```
/// use forgetful_map::ForgetfulTable;
///
/// let mut table = ForgetfulTable::try_new(3).unwrap();
/// table.put("a", 1);
/// table.put("b", 2);
/// table.put("c", 3);
///
/// // "a" and "c" are read, "b" never is
/// assert_eq!(table.get(&"a"), Some(&1));
/// assert_eq!(table.get(&"c"), Some(&3));
///
/// // full: "b" has the lowest access count and makes room
/// assert_eq!(table.put("d", 4), Some(("b", 2)));
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.get(&"b"), None);
/// ```
pub struct ForgetfulTable<K, V, S = DefaultHashBuilder> {
    plan: CapacityPlan,

    /// Fixed at construction, length `plan.physical()`
    slots: Box<[Option<Entry<K, V>>]>,

    /// Number of occupied slots, never decreases
    len: usize,

    hash_builder: S,

    metrics: ForgetfulMapMetrics,
}

impl<K: Hash + Eq, V> ForgetfulTable<K, V, DefaultHashBuilder> {
    /// Creates a table holding at most `capacity` entries, with the default hasher.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::ZeroCapacity`] for a capacity of zero and
    /// [`ForgetfulError::CapacityOverflow`] when no prime table length can be planned.
    pub fn try_new(capacity: usize) -> Result<Self, ForgetfulError> {
        Self::init(ForgetfulMapConfig::try_new(capacity)?, None)
    }

    /// Creates a table from a config, with an optional hasher.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::CapacityOverflow`] when no prime table length
    /// can be planned.
    pub fn init(
        config: ForgetfulMapConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ForgetfulError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ForgetfulTable<K, V, S> {
    /// Creates a table from a config and a hash builder.
    ///
    /// A deterministic `hash_builder` makes slot placement, and with it the
    /// tie-breaking between equally accessed entries, reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::CapacityOverflow`] when no prime table length
    /// can be planned.
    pub fn init_with_hasher(
        config: ForgetfulMapConfig,
        hash_builder: S,
    ) -> Result<Self, ForgetfulError> {
        let plan = CapacityPlan::new(config.capacity)?;
        let slots = (0..plan.physical().get()).map(|_| None).collect();

        tracing::debug!(
            capacity = plan.requested().get(),
            physical = plan.physical().get(),
            step_base = plan.step_base().get(),
            "planned forgetful table"
        );

        Ok(ForgetfulTable {
            plan,
            slots,
            len: 0,
            hash_builder,
            metrics: ForgetfulMapMetrics::default(),
        })
    }

    /// Maximum number of entries before eviction starts.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.plan.requested()
    }

    /// Length of the slot array (the next prime at or above the capacity).
    #[inline]
    pub fn physical_capacity(&self) -> NonZeroUsize {
        self.plan.physical()
    }

    /// The prime probe steps are derived from.
    #[inline]
    pub fn step_base(&self) -> NonZeroUsize {
        self.plan.step_base()
    }

    /// The capacity plan this table was built with.
    #[inline]
    pub fn plan(&self) -> &CapacityPlan {
        &self.plan
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entry has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` once `len` has reached the capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len >= self.plan.requested().get()
    }

    /// Counters collected by this table.
    #[inline]
    pub fn counters(&self) -> &ForgetfulMapMetrics {
        &self.metrics
    }

    #[inline]
    fn hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Stores `value` under `key`.
    ///
    /// Returns the pair this put displaced: the previous pair of an equal key,
    /// or the evicted pair when the table was full. Returns `None` when the key
    /// went into an empty slot.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if !self.is_full() {
            return self.insert_probed(key, value);
        }

        // An equal key can sit off its probe sequence after an eviction, so
        // search every slot.
        if let Some(index) = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Some(entry) if *entry.key() == key))
        {
            return self.overwrite(index, key, value);
        }

        match self.find_victim() {
            Some(index) => self.evict_into(index, key, value),
            None => self.insert_probed(key, value),
        }
    }

    /// [`put`](Self::put) for arguments that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::InvalidArgument`] if either the key or the
    /// value is `None`. The table is left untouched.
    pub fn try_put(
        &mut self,
        key: Option<K>,
        value: Option<V>,
    ) -> Result<Option<(K, V)>, ForgetfulError> {
        let key = key.ok_or_else(|| reject(ForgetfulError::ABSENT_KEY))?;
        let value = value.ok_or_else(|| reject(ForgetfulError::ABSENT_VALUE))?;
        Ok(self.put(key, value))
    }

    /// Walks the probe sequence from the key's start slot, overwriting an equal
    /// key or filling the first empty slot.
    ///
    /// Requires at least one empty slot.
    fn insert_probed(&mut self, key: K, value: V) -> Option<(K, V)> {
        let hash = self.hash(&key);
        let step = self.plan.step(hash);
        let mut index = self.plan.start(hash);

        loop {
            match &self.slots[index] {
                None => {
                    tracing::trace!(index, "inserted into empty slot");
                    self.slots[index] = Some(Entry::new(key, value));
                    self.len += 1;
                    self.metrics.record_insertion();
                    return None;
                }
                Some(entry) if *entry.key() == key => {
                    return self.overwrite(index, key, value);
                }
                Some(_) => index = self.plan.advance(index, step),
            }
        }
    }

    fn overwrite(&mut self, index: usize, key: K, value: V) -> Option<(K, V)> {
        tracing::trace!(index, "overwrote existing key");
        self.metrics.record_overwrite();
        mem::replace(&mut self.slots[index], Some(Entry::new(key, value))).map(Entry::into_pair)
    }

    fn evict_into(&mut self, index: usize, key: K, value: V) -> Option<(K, V)> {
        let victim = mem::replace(&mut self.slots[index], Some(Entry::new(key, value)));
        self.metrics.record_eviction();
        if let Some(entry) = &victim {
            tracing::debug!(
                index,
                access_count = entry.access_count(),
                "evicted least-accessed entry"
            );
        }
        victim.map(Entry::into_pair)
    }

    /// Picks the slot to evict, or `None` if no slot is occupied.
    fn find_victim(&self) -> Option<usize> {
        let count = |slot: &Option<Entry<K, V>>| slot.as_ref().map(Entry::access_count);

        let mut min = count(&self.slots[0]);
        if min == Some(0) {
            return Some(0);
        }

        for (index, slot) in self.slots.iter().enumerate().skip(1) {
            match count(slot) {
                Some(0) => return Some(index),
                Some(c) if min.map_or(true, |m| c < m) => min = Some(c),
                _ => {}
            }
        }

        let min = min?;
        self.slots.iter().position(|slot| count(slot) == Some(min))
    }

    /// Index of the slot holding `key`, following the probe sequence.
    ///
    /// Stops at the first empty slot or after `len` slots.
    fn probe<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash(key);
        let step = self.plan.step(hash);
        let mut index = self.plan.start(hash);

        for _ in 0..self.len {
            let entry = self.slots[index].as_ref()?;
            if entry.key().borrow() == key {
                return Some(index);
            }
            index = self.plan.advance(index, step);
        }
        None
    }

    /// Returns the value stored under `key` and bumps its access count by one.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.probe(key) {
            Some(index) => {
                self.metrics.record_hit();
                self.slots[index].as_mut().map(Entry::touch)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// [`get`](Self::get) for a key that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::InvalidArgument`] if `key` is `None`.
    pub fn try_get<Q>(&mut self, key: Option<&Q>) -> Result<Option<&V>, ForgetfulError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let key = key.ok_or_else(|| reject(ForgetfulError::ABSENT_KEY))?;
        Ok(self.get(key))
    }

    /// Current access count of `key`, or 0 if it is not found.
    ///
    /// Uses the same probe as [`get`](Self::get) but changes nothing.
    pub fn access_count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.probe(key)
            .and_then(|index| self.slots[index].as_ref())
            .map_or(0, Entry::access_count)
    }

    /// [`access_count`](Self::access_count) for a key that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::InvalidArgument`] if `key` is `None`.
    pub fn try_access_count<Q>(&self, key: Option<&Q>) -> Result<u64, ForgetfulError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let key = key.ok_or_else(|| reject(ForgetfulError::ABSENT_KEY))?;
        Ok(self.access_count(key))
    }

    /// Returns `true` if `get` would find `key`, without counting an access.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.probe(key).is_some()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for ForgetfulTable<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<K, V, S> fmt::Debug for ForgetfulTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgetfulTable")
            .field("capacity", &self.plan.requested())
            .field("physical", &self.plan.physical())
            .field("step_base", &self.plan.step_base())
            .field("len", &self.len)
            .finish()
    }
}
