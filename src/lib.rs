#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ForgetfulHashMap`] | Thread-safe map, one lock around the table |
//! | [`ForgetfulTable`] | The single-threaded table and eviction algorithm |
//! | [`CapacityPlan`] | Prime sizing for the double-hashing probe |
//!
//! ## Performance Characteristics
//!
//! | Operation | Not full | Full |
//! |-----------|----------|------|
//! | `get`          | O(1) average, at most `len` probes | same |
//! | `put` new key  | O(1) average | O(physical) eviction scan |
//! | `access_count` | O(1) average | same |
//!
//! ## Example
//!
//! ```rust
//! use forgetful_map::{ForgetfulHashMap, KeyValueMap};
//!
//! let map = ForgetfulHashMap::try_new(3).unwrap();
//! map.put("pcole@gmail.com", "Patrick Cole");
//! map.put("johnsmith@gmail.com", "John Smith");
//! map.put("marybrown@gmail.com", "Mary Brown");
//!
//! for _ in 0..3 {
//!     map.get(&"pcole@gmail.com");
//!     map.get(&"marybrown@gmail.com");
//! }
//! map.get(&"johnsmith@gmail.com");
//!
//! // full: the least-accessed entry makes room
//! map.put("paulcole@mail.co.uk", "Paul Cole");
//! assert_eq!(map.get(&"johnsmith@gmail.com"), None);
//! assert_eq!(map.size(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`prime`]: capacity planning
//! - [`entry`]: slot entries and their access counts
//! - [`table`]: the probing table
//! - [`concurrent`]: the synchronized map
//! - [`map`]: the key-value contract
//! - [`config`]: configuration
//! - [`error`]: error types
//! - [`metrics`]: counters and reporting

/// Prime capacity planning.
///
/// Sizes the slot array to a prime so the double-hashing probe reaches every slot.
pub mod prime;

/// Table entries.
pub mod entry;

/// Error types.
pub mod error;

/// Configuration structures.
pub mod config;

/// Counters and the metrics reporting trait.
pub mod metrics;

/// The single-threaded forgetful table.
///
/// Double-hashing slot layout, probing and the eviction scan.
pub mod table;

/// The synchronized forgetful map.
pub mod concurrent;

/// The minimal key-value contract.
pub mod map;

pub use concurrent::ForgetfulHashMap;
pub use config::ForgetfulMapConfig;
pub use entry::Entry;
pub use error::ForgetfulError;
pub use map::KeyValueMap;
pub use metrics::{CacheMetrics, ForgetfulMapMetrics};
pub use prime::CapacityPlan;
pub use table::ForgetfulTable;
