//! Cache Module
//!
//! Provides a sharded in-memory cache with per-entry TTL and background eviction.

mod entry;
mod router;
mod shard;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::{current_timestamp_nanos, resolve_expiration, StoredEntry, Ttl};
pub use router::ShardRouter;
pub use stats::{CacheCounters, CacheStats};
pub use store::{Cache, EvictHandler};

pub(crate) use shard::Shard;
pub(crate) use store::CacheInner;

// == Public Constants ==
/// Capacity used when none (0) is configured
pub const DEFAULT_CAPACITY: usize = 1_000_000;

/// Shard count used when none (0) is configured
pub const DEFAULT_SHARD_COUNT: usize = 100;

/// Sweep period used when a zero interval is configured
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);
