//! Session Cache - a sharded in-process TTL cache
//!
//! Bounded, sharded key-value storage with per-entry expiration and a
//! background eviction task, plus the session registry and HTTP surface
//! built on top of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod sessions;
mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheStats, EvictHandler, Ttl};
pub use config::Config;
pub use error::{CacheError, SessionError};
pub use sessions::{Session, SessionRegistry};
