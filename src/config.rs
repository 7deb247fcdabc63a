//! Configuration Module
//!
//! Handles loading and validating cache configuration.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default number of entries a cache can hold.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default interval between TTL sweeps, in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 200;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults,
/// or deserialized as part of a larger application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time to live in seconds for every entry, 0 disables expiration
    pub ttl_seconds: i64,
    /// Background sweep interval in milliseconds
    pub sweep_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a config with the given capacity and TTL, and the default sweep interval.
    pub fn new(capacity: usize, ttl_seconds: i64) -> Self {
        Self {
            capacity,
            ttl_seconds,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECONDS` - Entry TTL in seconds, 0 = disabled (default: 0)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 200)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            sweep_interval_ms: env::var("CACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }

    // == Validate ==
    /// Checks that the configuration describes a usable cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        if self.ttl_seconds < 0 {
            return Err(CacheError::InvalidTtl(self.ttl_seconds));
        }
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::InvalidSweepInterval(self.sweep_interval_ms));
        }
        Ok(())
    }

    /// Returns the TTL as a duration, or None when expiration is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        u64::try_from(self.ttl_seconds)
            .ok()
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Returns the interval between background TTL sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl_seconds: 0,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}
