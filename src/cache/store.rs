//! Cache Store Module
//!
//! Public operation surface of the sharded TTL cache. Keys are routed to a
//! shard, and each operation holds only that shard's lock for a single map
//! lookup or mutation. A background task (see [`crate::tasks`]) sweeps
//! expired entries out of the shards.

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::entry::{current_timestamp_nanos, resolve_expiration};
use crate::cache::{
    CacheCounters, CacheStats, Shard, ShardRouter, StoredEntry, Ttl, DEFAULT_CAPACITY,
    DEFAULT_SHARD_COUNT, DEFAULT_SWEEP_INTERVAL,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_eviction_task, EvictEvent};

/// Callback invoked with each value removed by the eviction task.
pub type EvictHandler<V> = Arc<dyn Fn(V) + Send + Sync>;

// == Shared State ==
/// State shared between the cache handle and its eviction task.
pub(crate) struct CacheInner<V> {
    capacity: usize,
    default_ttl: Duration,
    router: ShardRouter,
    shards: Box<[Shard<V>]>,
    size: AtomicUsize,
    closed: AtomicBool,
    counters: CacheCounters,
    on_evict: Option<EvictHandler<V>>,
    pub(crate) shutdown: Notify,
}

impl<V> CacheInner<V> {
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn load_size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    fn inc_size(&self) {
        self.size.fetch_add(1, Ordering::AcqRel);
    }

    fn dec_size(&self) {
        // Close may reset the counter underneath a racing delete
        let _ = self
            .size
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(1))
            });
    }

    fn is_full(&self) -> bool {
        self.load_size() >= self.capacity
    }

    /// Collects eviction events for every expired entry of one shard.
    pub(crate) fn sweep_shard(&self, shard_idx: usize) -> Vec<EvictEvent> {
        let Some(shard) = self.shards.get(shard_idx) else {
            return Vec::new();
        };
        shard
            .expired_fingerprints(current_timestamp_nanos())
            .into_iter()
            .map(|fingerprint| EvictEvent {
                shard: shard_idx,
                fingerprint,
            })
            .collect()
    }
}

impl<V: Send + 'static> CacheInner<V> {
    /// Removes the entry named by `event` if it is still present and expired.
    ///
    /// Returns false when the entry was deleted, replaced or refreshed since
    /// it was queued.
    pub(crate) fn evict(&self, event: EvictEvent) -> bool {
        let Some(shard) = self.shards.get(event.shard) else {
            return false;
        };
        let removed = {
            let mut entries = shard.write();
            let still_expired = entries
                .get(&event.fingerprint)
                .is_some_and(|entry| entry.is_expired());
            if !still_expired {
                return false;
            }
            self.dec_size();
            entries.remove(&event.fingerprint)
        };
        let Some(entry) = removed else {
            return false;
        };
        self.counters.record_eviction();

        if let Some(handler) = &self.on_evict {
            let handler = Arc::clone(handler);
            tokio::task::spawn_blocking(move || handler(entry.value));
        }
        true
    }
}

// == Cache ==
/// Sharded, bounded, TTL-aware key-value cache.
///
/// `size()` is approximate: an expired entry keeps counting until the
/// eviction task removes it or it is deleted explicitly. The capacity
/// check is made against that counter without a global lock, so heavy
/// concurrent inserts may briefly admit slightly more than `capacity`
/// keys or reject one slightly early.
///
/// Must be created inside a tokio runtime. Dropping the cache closes it.
pub struct Cache<V> {
    inner: Arc<CacheInner<V>>,
    worker: JoinHandle<()>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and starts its eviction task.
    ///
    /// # Arguments
    /// * `capacity` - Maximum live keys (0 uses the default of 1,000,000)
    /// * `shard_count` - Number of shards (0 uses the default of 100)
    /// * `default_ttl` - TTL applied for `Ttl::Default`; zero means never expire
    /// * `sweep_interval` - Period between single-shard sweeps (zero uses 1s)
    /// * `on_evict` - Optional callback fired for every evicted value
    pub fn new(
        capacity: usize,
        shard_count: usize,
        default_ttl: Duration,
        sweep_interval: Duration,
        on_evict: Option<EvictHandler<V>>,
    ) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        let shard_count = if shard_count == 0 {
            DEFAULT_SHARD_COUNT
        } else {
            shard_count
        };
        let sweep_interval = if sweep_interval.is_zero() {
            DEFAULT_SWEEP_INTERVAL
        } else {
            sweep_interval
        };

        let inner = Arc::new(CacheInner {
            capacity,
            default_ttl,
            router: ShardRouter::new(shard_count),
            shards: (0..shard_count).map(|_| Shard::new()).collect(),
            size: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            counters: CacheCounters::new(),
            on_evict,
            shutdown: Notify::new(),
        });
        let worker = spawn_eviction_task(Arc::clone(&inner), sweep_interval);

        debug!(capacity, shard_count, ?default_ttl, ?sweep_interval, "cache created");
        Self { inner, worker }
    }

    /// Creates a cache from service configuration.
    pub fn from_config(config: &Config, on_evict: Option<EvictHandler<V>>) -> Self {
        Self::new(
            config.capacity,
            config.shard_count,
            config.default_ttl(),
            config.sweep_interval(),
            on_evict,
        )
    }

    fn check_open(&self) -> Result<()> {
        if self.inner.is_closed() {
            Err(CacheError::Closed)
        } else {
            Ok(())
        }
    }

    fn shard_for(&self, key: &str) -> (u64, &Shard<V>) {
        let (fingerprint, idx) = self.inner.router.route(key);
        (fingerprint, &self.inner.shards[idx])
    }

    // == Set ==
    /// Stores `value` under `key`, inserting or overwriting.
    ///
    /// Returns the previous value when a live entry was overwritten. An
    /// expired entry's slot is reused silently. Only new keys are checked
    /// against capacity.
    pub fn set(&self, key: &str, value: V, ttl: impl Into<Ttl>) -> Result<Option<V>> {
        self.check_open()?;
        let expires_at = resolve_expiration(ttl.into(), self.inner.default_ttl);
        let (fingerprint, shard) = self.shard_for(key);

        let mut entries = shard.write();
        match entries.entry(fingerprint) {
            Entry::Occupied(mut slot) => {
                let old = slot.insert(StoredEntry::new(value, expires_at));
                Ok((!old.is_expired()).then_some(old.value))
            }
            Entry::Vacant(slot) => {
                if self.inner.is_full() {
                    return Err(CacheError::CapacityExceeded(self.inner.capacity));
                }
                self.inner.inc_size();
                slot.insert(StoredEntry::new(value, expires_at));
                Ok(None)
            }
        }
    }

    // == Add ==
    /// Stores `value` only if no live entry exists under `key`.
    ///
    /// An expired entry under the key is overwritten in place and size is
    /// left unchanged, since that slot is already counted.
    pub fn add(&self, key: &str, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        self.check_open()?;
        if self.inner.is_full() {
            return Err(CacheError::CapacityExceeded(self.inner.capacity));
        }
        let expires_at = resolve_expiration(ttl.into(), self.inner.default_ttl);
        let (fingerprint, shard) = self.shard_for(key);

        let mut entries = shard.write();
        match entries.entry(fingerprint) {
            Entry::Occupied(mut slot) => {
                if !slot.get().is_expired() {
                    return Err(CacheError::AlreadyExists(key.to_string()));
                }
                slot.insert(StoredEntry::new(value, expires_at));
            }
            Entry::Vacant(slot) => {
                self.inner.inc_size();
                slot.insert(StoredEntry::new(value, expires_at));
            }
        }
        Ok(())
    }

    // == Replace ==
    /// Overwrites a live entry, returning its previous value.
    pub fn replace(&self, key: &str, value: V, ttl: impl Into<Ttl>) -> Result<V> {
        self.check_open()?;
        let expires_at = resolve_expiration(ttl.into(), self.inner.default_ttl);
        let (fingerprint, shard) = self.shard_for(key);

        let mut entries = shard.write();
        match entries.get_mut(&fingerprint) {
            Some(entry) if !entry.is_expired() => {
                let old = std::mem::replace(entry, StoredEntry::new(value, expires_at));
                Ok(old.value)
            }
            _ => Err(CacheError::DoesNotExist(key.to_string())),
        }
    }

    // == Get ==
    /// Returns the value under `key` if present and not expired.
    pub fn get(&self, key: &str) -> Result<V> {
        self.check_open()?;
        let (fingerprint, shard) = self.shard_for(key);

        let value = {
            let entries = shard.read();
            entries
                .get(&fingerprint)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value.clone())
        };

        match value {
            Some(value) => {
                self.inner.counters.record_hit();
                Ok(value)
            }
            None => {
                self.inner.counters.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Delete ==
    /// Removes the entry under `key`.
    ///
    /// An expired entry is still physically removed, but the call reports
    /// `NotFound` since the key was already logically gone.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.check_open()?;
        let (fingerprint, shard) = self.shard_for(key);

        let removed = {
            let mut entries = shard.write();
            let removed = entries.remove(&fingerprint);
            if removed.is_some() {
                self.inner.dec_size();
            }
            removed
        };

        match removed {
            Some(entry) if !entry.is_expired() => Ok(()),
            _ => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Keep Alive ==
    /// Refreshes the expiration of a live entry and returns its value.
    pub fn keep_alive(&self, key: &str, ttl: impl Into<Ttl>) -> Result<V> {
        self.check_open()?;
        let expires_at = resolve_expiration(ttl.into(), self.inner.default_ttl);
        let (fingerprint, shard) = self.shard_for(key);

        let mut entries = shard.write();
        match entries.get_mut(&fingerprint) {
            Some(entry) if !entry.is_expired() => {
                entry.expires_at = expires_at;
                Ok(entry.value.clone())
            }
            _ => Err(CacheError::NotFound(key.to_string())),
        }
    }
}

impl<V> Cache<V> {
    // == Size ==
    /// Approximate number of stored entries; 0 once closed.
    ///
    /// May over-count by the number of expired entries not yet swept.
    pub fn size(&self) -> usize {
        if self.inner.is_closed() {
            0
        } else {
            self.inner.load_size()
        }
    }

    // == Stats ==
    /// Returns a snapshot of hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot(self.size())
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn shard_count(&self) -> usize {
        self.inner.shard_count()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &CacheInner<V> {
        &self.inner
    }

    /// True once the eviction task has exited.
    pub fn is_worker_finished(&self) -> bool {
        self.worker.is_finished()
    }

    // == Close ==
    /// Stops the eviction task and drops every entry. Idempotent.
    ///
    /// Shards are cleared one at a time, so an operation racing with close
    /// may still observe a shard that has not been cleared yet.
    pub fn close(&self) {
        if self
            .inner
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        self.inner.shutdown.notify_one();

        let dropped: usize = self.inner.shards.iter().map(Shard::clear).sum();
        self.inner.size.store(0, Ordering::Release);

        info!(dropped, "cache closed");
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.inner.capacity)
            .field("shard_count", &self.inner.shards.len())
            .field("default_ttl", &self.inner.default_ttl)
            .field("size", &self.inner.load_size())
            .field("closed", &self.inner.is_closed())
            .finish()
    }
}
