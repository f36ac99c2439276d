//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_SHARD_COUNT};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of live keys the cache admits
    pub capacity: usize,
    /// Number of independently locked shards
    pub shard_count: usize,
    /// Default TTL in seconds for entries stored with `Ttl::Default`
    pub default_ttl: u64,
    /// Period of the background sweep timer in milliseconds
    pub sweep_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum live keys (default: 1000000)
    /// - `CACHE_SHARDS` - Shard count (default: 100)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `SWEEP_INTERVAL_MS` - Sweep period in milliseconds (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            shard_count: env_or("CACHE_SHARDS", defaults.shard_count),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            sweep_interval_ms: env_or("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            shard_count: DEFAULT_SHARD_COUNT,
            default_ttl: 3600,
            sweep_interval_ms: 1000,
            server_port: 8080,
        }
    }
}
