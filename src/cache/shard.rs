//! Shard Module
//!
//! An independent partition of the keyspace guarded by its own reader/writer lock.

use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::StoredEntry;

/// Map from key fingerprint to stored entry.
pub type ShardMap<V> = HashMap<u64, StoredEntry<V>>;

// == Shard ==
/// A fingerprint-indexed map that is only ever touched under its lock.
#[derive(Debug)]
pub struct Shard<V> {
    entries: RwLock<ShardMap<V>>,
}

impl<V> Shard<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Shared access for lookups and sweeps.
    pub fn read(&self) -> RwLockReadGuard<'_, ShardMap<V>> {
        self.entries.read()
    }

    /// Exclusive access for inserts, updates and deletes.
    pub fn write(&self) -> RwLockWriteGuard<'_, ShardMap<V>> {
        self.entries.write()
    }

    /// Fingerprints of entries expired at `now`.
    pub fn expired_fingerprints(&self, now: i64) -> Vec<u64> {
        self.read()
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(fingerprint, _)| *fingerprint)
            .collect()
    }

    /// Drops every entry, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut entries = self.write();
        let count = entries.len();
        *entries = HashMap::new();
        count
    }
}

impl<V> Default for Shard<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_fingerprints() {
        let shard = Shard::new();
        {
            let mut entries = shard.write();
            entries.insert(1, StoredEntry::new("live", 0));
            entries.insert(2, StoredEntry::new("stale", 100));
            entries.insert(3, StoredEntry::new("fresh", 10_000));
        }

        assert_eq!(shard.expired_fingerprints(500), vec![2]);
        assert_eq!(shard.read().len(), 3);
    }

    #[test]
    fn test_clear() {
        let shard = Shard::new();
        shard.write().insert(1, StoredEntry::new("a", 0));
        shard.write().insert(2, StoredEntry::new("b", 0));

        assert_eq!(shard.clear(), 2);
        assert!(shard.read().is_empty());
    }
}
