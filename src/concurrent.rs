//! Synchronized Forgetful Map
//!
//! [`ForgetfulHashMap`] is a [`ForgetfulTable`] behind a single
//! `parking_lot::Mutex`. Every operation, `get` included, takes the lock for
//! its whole duration and runs to completion before releasing it.
//!
//! ## Why one lock?
//!
//! The eviction scan looks at every slot, so a put on a full table touches
//! the whole array. Striping the table across several locks would split the
//! access counts that eviction compares. `get` also writes (it bumps the
//! access count), so a `RwLock` would take the write side on every call anyway.
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │ ForgetfulHashMap                          │
//! │  ┌─────────────────────────────────────┐  │
//! │  │ Mutex                               │  │
//! │  │  ┌───────────────────────────────┐  │  │
//! │  │  │ ForgetfulTable                │  │  │
//! │  │  │ [slot][slot][slot] ... [slot] │  │  │
//! │  │  └───────────────────────────────┘  │  │
//! │  └─────────────────────────────────────┘  │
//! └───────────────────────────────────────────┘
//! ```
//!
//! Values leave the lock as clones (`get`) or through a closure that runs
//! while the lock is held (`get_with`). No reference to a slot escapes.
//!
//! # Example
//!
//! ```rust
//! use forgetful_map::ForgetfulHashMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = Arc::new(ForgetfulHashMap::try_new(3).unwrap());
//! map.put("hits".to_string(), 0);
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let map = Arc::clone(&map);
//!         thread::spawn(move || {
//!             for _ in 0..100 {
//!                 map.get("hits");
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(map.access_count("hits"), 400);
//! ```

use crate::config::ForgetfulMapConfig;
use crate::error::ForgetfulError;
use crate::map::KeyValueMap;
use crate::metrics::{CacheMetrics, ForgetfulMapMetrics};
use crate::table::{reject, ForgetfulTable};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe, fixed-capacity map that forgets its least-accessed entry when full.
pub struct ForgetfulHashMap<K, V, S = DefaultHashBuilder> {
    table: Mutex<ForgetfulTable<K, V, S>>,
}

impl<K: Hash + Eq, V> ForgetfulHashMap<K, V, DefaultHashBuilder> {
    /// Creates a map holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::ZeroCapacity`] for a capacity of zero and
    /// [`ForgetfulError::CapacityOverflow`] when no prime table length can be planned.
    pub fn try_new(capacity: usize) -> Result<Self, ForgetfulError> {
        ForgetfulTable::try_new(capacity).map(Self::from_table)
    }

    /// Creates a map from a config, with an optional hasher.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::CapacityOverflow`] when no prime table length
    /// can be planned.
    pub fn init(
        config: ForgetfulMapConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ForgetfulError> {
        ForgetfulTable::init(config, hasher).map(Self::from_table)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ForgetfulHashMap<K, V, S> {
    /// Creates a map from a config and a hash builder.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::CapacityOverflow`] when no prime table length
    /// can be planned.
    pub fn init_with_hasher(
        config: ForgetfulMapConfig,
        hash_builder: S,
    ) -> Result<Self, ForgetfulError> {
        ForgetfulTable::init_with_hasher(config, hash_builder).map(Self::from_table)
    }

    /// Wraps an existing table.
    pub fn from_table(table: ForgetfulTable<K, V, S>) -> Self {
        ForgetfulHashMap {
            table: Mutex::new(table),
        }
    }

    /// Unwraps the table.
    pub fn into_inner(self) -> ForgetfulTable<K, V, S> {
        self.table.into_inner()
    }

    /// Maximum number of entries before eviction starts.
    pub fn capacity(&self) -> NonZeroUsize {
        self.table.lock().capacity()
    }

    /// Length of the slot array.
    pub fn physical_capacity(&self) -> NonZeroUsize {
        self.table.lock().physical_capacity()
    }

    /// The prime probe steps are derived from.
    pub fn step_base(&self) -> NonZeroUsize {
        self.table.lock().step_base()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Returns `true` if no entry has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Snapshot of the counters.
    pub fn counters(&self) -> ForgetfulMapMetrics {
        self.table.lock().counters().clone()
    }

    /// Stores `value` under `key`, evicting the least-accessed entry if the map is full.
    ///
    /// Returns the displaced pair, if any.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.table.lock().put(key, value)
    }

    /// [`put`](Self::put) for arguments that may be absent.
    ///
    /// Arguments are checked before the lock is taken.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::InvalidArgument`] if either is `None`.
    pub fn try_put(
        &self,
        key: Option<K>,
        value: Option<V>,
    ) -> Result<Option<(K, V)>, ForgetfulError> {
        let key = key.ok_or_else(|| reject(ForgetfulError::ABSENT_KEY))?;
        let value = value.ok_or_else(|| reject(ForgetfulError::ABSENT_VALUE))?;
        Ok(self.put(key, value))
    }

    /// Returns a clone of the value under `key`, counting one access.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.table.lock().get(key).cloned()
    }

    /// Applies `f` to the value under `key` while the lock is held, counting one access.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.table.lock().get(key).map(f)
    }

    /// [`get`](Self::get) for a key that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ForgetfulError::InvalidArgument`] if `key` is `None`.
    pub fn try_get<Q>(&self, key: Option<&Q>) -> Result<Option<V>, ForgetfulError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let key = key.ok_or_else(|| reject(ForgetfulError::ABSENT_KEY))?;
        Ok(self.get(key))
    }

    /// Current access count of `key`, or 0 if it is not found.
    pub fn access_count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.lock().access_count(key)
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
        self.table.lock().contains_key(key)
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> KeyValueMap<K, V> for ForgetfulHashMap<K, V, S> {
    fn put(&self, key: K, value: V) {
        ForgetfulHashMap::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        ForgetfulHashMap::get(self, key)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for ForgetfulHashMap<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.table.lock().counters().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "FORGETFUL"
    }
}

impl<K, V, S> fmt::Debug for ForgetfulHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table.try_lock() {
            Some(table) => f
                .debug_struct("ForgetfulHashMap")
                .field("table", &*table)
                .finish(),
            None => f
                .debug_struct("ForgetfulHashMap")
                .field("table", &"<locked>")
                .finish(),
        }
    }
}
