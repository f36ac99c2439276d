//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Eviction: sweeps one shard per tick for expired entries and removes them

mod eviction;

pub(crate) use eviction::{spawn_eviction_task, EvictEvent};
