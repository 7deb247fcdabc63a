//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Configuration errors reported when a cache is constructed.
///
/// Runtime operations never fail: a missing key is `None`, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be at least one entry
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// TTL must not be negative
    #[error("Invalid TTL: {0} seconds (must not be negative)")]
    InvalidTtl(i64),

    /// Sweep interval must be non-zero
    #[error("Invalid sweep interval: {0} ms (must be greater than zero)")]
    InvalidSweepInterval(u64),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
