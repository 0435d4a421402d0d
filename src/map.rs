//! Minimal Key-Value Contract
//!
//! The three operations callers of a forgetful map rely on. The trait takes
//! `&self` so that it can be shared across threads behind an `Arc`.

/// A bounded key-value store.
pub trait KeyValueMap<K, V> {
    /// Associates `value` with `key`, replacing any previous value for an equal key.
    fn put(&self, key: K, value: V);

    /// Returns a copy of the value associated with `key`, if any.
    fn get(&self, key: &K) -> Option<V>;

    /// Returns the number of stored entries.
    fn size(&self) -> usize;
}
