//! Shard Router Module
//!
//! Maps string keys to a 64-bit fingerprint and to the shard that owns it.

use xxhash_rust::xxh3::xxh3_64;

// == Router ==
/// Routes keys onto a fixed number of shards.
#[derive(Debug, Clone, Copy)]
pub struct ShardRouter {
    shard_count: usize,
}

impl ShardRouter {
    /// Creates a router over `shard_count` shards (must be non-zero).
    pub fn new(shard_count: usize) -> Self {
        Self {
            shard_count: shard_count.max(1),
        }
    }

    /// Returns `(fingerprint, shard_index)` for a key.
    pub fn route(&self, key: &str) -> (u64, usize) {
        let fingerprint = fingerprint(key);
        (fingerprint, (fingerprint % self.shard_count as u64) as usize)
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }
}

/// Fast non-cryptographic 64-bit hash of a key.
///
/// Distinct keys sharing a fingerprint alias the same slot; the 64-bit
/// space makes this negligible for session identifiers.
pub fn fingerprint(key: &str) -> u64 {
    xxh3_64(key.as_bytes())
}
