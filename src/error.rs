//! Error types for the forgetful map.
//!
//! Filling the table is never an error: once full, `put` evicts. The only
//! failures are arguments that are absent at the boundary and capacities the
//! table cannot be planned for.

use thiserror::Error;

/// Errors returned by the fallible operations of the forgetful map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ForgetfulError {
    /// A key or value was absent where one is required.
    ///
    /// Raised before the table is locked or mutated.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The requested logical capacity was zero.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    /// No prime at or above the requested capacity fits in `usize`.
    #[error("cannot plan a prime table length for capacity {requested}")]
    CapacityOverflow {
        /// The logical capacity that was asked for.
        requested: usize,
    },
}

impl ForgetfulError {
    pub(crate) const ABSENT_KEY: Self = ForgetfulError::InvalidArgument("key can't be absent");
    pub(crate) const ABSENT_VALUE: Self =
        ForgetfulError::InvalidArgument("value can't be absent");
}
