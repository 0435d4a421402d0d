//! Configuration for the forgetful map.
//!
//! The only knob is the logical capacity: how many entries the table keeps
//! before every further insertion of a new key evicts an existing one. The
//! physical slot array is sized from it by [`CapacityPlan`](crate::prime::CapacityPlan).
//!
//! # Examples
//!
//! ```
//! use forgetful_map::config::ForgetfulMapConfig;
//! use forgetful_map::ForgetfulHashMap;
//! use core::num::NonZeroUsize;
//!
//! let config = ForgetfulMapConfig {
//!     capacity: NonZeroUsize::new(4).unwrap(),
//! };
//! let map: ForgetfulHashMap<String, i32> = ForgetfulHashMap::init(config, None).unwrap();
//! assert_eq!(map.capacity().get(), 4);
//! assert_eq!(map.physical_capacity().get(), 5);
//! ```

use crate::error::ForgetfulError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for a forgetful table or map.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ForgetfulMapConfig {
    /// Maximum number of entries held before eviction starts
    pub capacity: NonZeroUsize,
}

impl ForgetfulMapConfig {
    /// Builds a config from a plain integer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::ZeroCapacity`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ForgetfulError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ForgetfulError::ZeroCapacity)?;
        Ok(ForgetfulMapConfig { capacity })
    }
}

impl fmt::Debug for ForgetfulMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgetfulMapConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
