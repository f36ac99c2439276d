//! TTL Eviction Task
//!
//! Single background task that finds expired cache entries and removes them.
//!
//! Each timer tick scans exactly one shard (round-robin) under its read lock
//! and queues an event per expired entry. Queued events are drained by the
//! same loop, which re-validates each entry under the shard's write lock
//! before deleting it, so an entry refreshed or replaced after being queued
//! survives.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::CacheInner;

/// Location of an expired entry awaiting removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EvictEvent {
    pub shard: usize,
    pub fingerprint: u64,
}

/// Spawns the eviction task for a cache.
///
/// The event queue is bounded by the cache capacity, capped at the largest
/// buffer a tokio channel accepts. The task runs until the cache's shutdown
/// is notified.
///
/// # Arguments
/// * `inner` - State shared with the owning cache
/// * `sweep_interval` - Period between single-shard sweeps (non-zero)
pub(crate) fn spawn_eviction_task<V>(
    inner: Arc<CacheInner<V>>,
    sweep_interval: Duration,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let queue_size = inner.capacity().min(Semaphore::MAX_PERMITS);
    let (tx, mut rx) = mpsc::channel::<EvictEvent>(queue_size);

    tokio::spawn(async move {
        info!(
            "Starting eviction task with interval of {:?} over {} shards",
            sweep_interval,
            inner.shard_count()
        );

        let mut ticker = time::interval_at(Instant::now() + sweep_interval, sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut next_shard = 0usize;

        while !inner.is_closed() {
            tokio::select! {
                biased;

                _ = inner.shutdown.notified() => break,

                Some(event) = rx.recv() => {
                    if inner.evict(event) {
                        debug!(shard = event.shard, fingerprint = event.fingerprint, "evicted expired entry");
                    }
                }

                _ = ticker.tick() => {
                    let events = inner.sweep_shard(next_shard);
                    let found = events.len();
                    let mut queued = 0usize;
                    for event in events {
                        match tx.try_send(event) {
                            Ok(()) => queued += 1,
                            Err(TrySendError::Full(_)) => {
                                warn!(shard = next_shard, found, queued, "eviction queue full, sweep cut short");
                                break;
                            }
                            Err(TrySendError::Closed(_)) => break,
                        }
                    }
                    if found > 0 {
                        debug!(shard = next_shard, found, queued, "sweep queued expired entries");
                    }
                    next_shard = (next_shard + 1) % inner.shard_count();
                }
            }
        }

        info!("Eviction task stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::sleep;

    use super::*;
    use crate::cache::{Cache, EvictHandler, Ttl};

    const LONG: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_eviction_task_removes_expired_entries() {
        let cache: Cache<String> =
            Cache::new(100, 1, LONG, Duration::from_millis(50), None);

        cache
            .set("expire_soon", "value".to_string(), Duration::from_millis(50))
            .unwrap();
        assert_eq!(cache.size(), 1);

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(cache.size(), 0, "Expired entry should have been swept");
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test]
    async fn test_eviction_task_preserves_valid_entries() {
        let cache: Cache<String> =
            Cache::new(100, 1, LONG, Duration::from_millis(50), None);

        cache.set("long_lived", "value".to_string(), LONG).unwrap();
        cache.set("forever", "value".to_string(), Ttl::Never).unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(cache.size(), 2);
        assert_eq!(cache.get("long_lived").unwrap(), "value");
        assert_eq!(cache.get("forever").unwrap(), "value");
    }

    #[tokio::test]
    async fn test_eviction_task_fires_callback() {
        let evicted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evicted);
        let handler: EvictHandler<String> = Arc::new(move |value: String| {
            assert_eq!(value, "session");
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let cache = Cache::new(100, 2, Duration::from_millis(50), Duration::from_millis(30), Some(handler));

        cache.add("a", "session".to_string(), Ttl::Default).unwrap();
        cache.add("b", "session".to_string(), Ttl::Default).unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(cache.size(), 0);
        assert_eq!(evicted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_eviction_task_stops_on_close() {
        let cache: Cache<String> =
            Cache::new(100, 1, LONG, Duration::from_millis(20), None);

        cache.close();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.is_worker_finished(), "Task should be finished after close");
    }

    #[tokio::test]
    async fn test_eviction_task_with_unbounded_capacity() {
        let cache: Cache<String> =
            Cache::new(usize::MAX, 4, Duration::from_secs(60), Duration::from_millis(20), None);
        assert_eq!(cache.capacity(), usize::MAX);

        cache.set("k", "v".to_string(), Duration::from_millis(20)).unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test]
    async fn test_evict_skips_refreshed_entry() {
        let cache: Cache<String> = Cache::new(100, 1, LONG, LONG, None);

        cache.set("key", "old".to_string(), Duration::from_millis(20)).unwrap();
        sleep(Duration::from_millis(50));

        let events = cache.inner().sweep_shard(0);
        assert_eq!(events.len(), 1);

        // Resurrect the key before the queued event is processed
        cache.set("key", "new".to_string(), LONG).unwrap();

        assert!(!cache.inner().evict(events[0]));
        assert_eq!(cache.get("key").unwrap(), "new");
        assert_eq!(cache.size(), 1);
    }

    #[tokio::test]
    async fn test_evict_skips_deleted_entry() {
        let cache: Cache<String> = Cache::new(100, 1, LONG, LONG, None);

        cache.set("key", "v".to_string(), Duration::from_millis(20)).unwrap();
        sleep(Duration::from_millis(50));

        let events = cache.inner().sweep_shard(0);
        let _ = cache.delete("key");

        assert!(!cache.inner().evict(events[0]));
        assert_eq!(cache.size(), 0);
    }
}
