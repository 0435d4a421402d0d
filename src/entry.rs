//! Table Entry
//!
//! A slot of the probing table holds `Option<Entry<K, V>>`: `None` is an empty
//! slot, `Some` an occupied one. An entry carries its key, its value and the
//! number of successful lookups that have found it.
//!
//! Entries are never merged. Overwriting a key or evicting a victim replaces
//! the whole entry, so the access count of the replacement starts from zero.

use core::fmt;

/// A key-value pair plus its access count.
#[derive(Clone)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

impl<K, V> Entry<K, V> {
    /// Creates a fresh entry with an access count of zero.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Entry {
            key,
            value,
            access_count: 0,
        }
    }

    /// The entry's key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The entry's value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Number of lookups that have found this entry.
    #[inline]
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Records one successful lookup and returns the value.
    #[inline]
    pub(crate) fn touch(&mut self) -> &V {
        self.access_count += 1;
        &self.value
    }

    /// Consumes the entry, returning the key-value pair.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("access_count", &self.access_count)
            .finish()
    }
}
