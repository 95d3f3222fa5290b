//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheBuilder, SharedCache, WritePolicy};
use crate::error::{CacheError, Result};

const CAPACITY_VAR: &str = "CACHE_CAPACITY";
const WRITE_POLICY_VAR: &str = "CACHE_WRITE_POLICY";
const CLEANUP_INTERVAL_VAR: &str = "CLEANUP_INTERVAL_MS";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries; zero or negative means unbounded
    pub capacity: i64,
    /// Whether overwriting a key refreshes its recency
    pub write_policy: WritePolicy,
    /// Background cleanup interval in milliseconds; 0 disables the sweep
    pub cleanup_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_WRITE_POLICY` - `keep` or `bump` (default: keep)
    /// - `CLEANUP_INTERVAL_MS` - Cleanup frequency in milliseconds (default: 1000)
    ///
    /// Unset variables take their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            capacity: read_var(&lookup, CAPACITY_VAR, defaults.capacity)?,
            write_policy: read_var(&lookup, WRITE_POLICY_VAR, defaults.write_policy)?,
            cleanup_interval_ms: read_var(
                &lookup,
                CLEANUP_INTERVAL_VAR,
                defaults.cleanup_interval_ms,
            )?,
        })
    }

    /// The sweep interval, or None when the sweep is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_ms > 0).then(|| Duration::from_millis(self.cleanup_interval_ms))
    }

    /// Builds a shared cache with this configuration.
    pub fn build_cache<V>(&self) -> SharedCache<V> {
        CacheBuilder::new(self.capacity)
            .write_policy(self.write_policy)
            .build_shared()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            write_policy: WritePolicy::KeepPosition,
            cleanup_interval_ms: 1000,
        }
    }
}

fn read_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig { var, value }),
    }
}
