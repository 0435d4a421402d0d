//! Forgetful Map Metrics
//!
//! Counters kept alongside the table and reported through [`CacheMetrics`] as
//! a `BTreeMap`, so the keys always come out in the same order.
//!
//! Only `get` counts as a request. `access_count` and `contains_key` are
//! diagnostics and leave the counters alone.

use std::collections::BTreeMap;

/// Trait for reporting cache metrics.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification.
    fn algorithm_name(&self) -> &'static str;
}

/// Counters for a forgetful table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForgetfulMapMetrics {
    /// Number of `get` calls
    pub requests: u64,

    /// Number of `get` calls that found their key
    pub cache_hits: u64,

    /// New keys stored, into an empty slot or over an evicted entry
    pub insertions: u64,

    /// Puts that replaced the entry of an equal key
    pub overwrites: u64,

    /// Entries discarded to make room for a new key
    pub evictions: u64,
}

impl ForgetfulMapMetrics {
    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new key stored in an empty slot.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an in-place overwrite of an existing key.
    #[inline]
    pub fn record_overwrite(&mut self) {
        self.overwrites += 1;
    }

    /// Records a new key stored over an evicted entry.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
        self.insertions += 1;
    }

    /// Fraction of lookups that hit, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, or 0.0 before the first lookup.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("overwrites".to_string(), self.overwrites as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);

        if self.insertions > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.insertions as f64,
            );
        }

        metrics
    }
}

impl CacheMetrics for ForgetfulMapMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "FORGETFUL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_before_any_request() {
        let metrics = ForgetfulMapMetrics::default();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert!(!metrics.to_btreemap().contains_key("eviction_rate"));
    }

    #[test]
    fn test_counters_and_report() {
        let mut metrics = ForgetfulMapMetrics::default();
        metrics.record_insertion();
        metrics.record_insertion();
        metrics.record_overwrite();
        metrics.record_eviction();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);

        let report = metrics.metrics();
        assert_eq!(report["requests"], 4.0);
        assert_eq!(report["cache_misses"], 1.0);
        assert_eq!(report["insertions"], 3.0);
        assert_eq!(report["overwrites"], 1.0);
        assert_eq!(report["evictions"], 1.0);
        assert_eq!(metrics.algorithm_name(), "FORGETFUL");

        let keys: Vec<&String> = report.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
