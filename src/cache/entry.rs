//! Cache Entry Module
//!
//! Defines stored entries, their expiration timestamps and the TTL sentinels.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == TTL ==
/// Time-to-live requested by a cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the cache's configured default TTL
    #[default]
    Default,
    /// The entry never expires
    Never,
    /// The entry expires once this duration has elapsed
    After(Duration),
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::After(duration)
    }
}

// == Stored Entry ==
/// A value held by a shard together with its absolute expiration.
#[derive(Debug, Clone)]
pub struct StoredEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix nanoseconds), 0 = never expires
    pub expires_at: i64,
}

impl<V> StoredEntry<V> {
    // == Constructor ==
    pub fn new(value: V, expires_at: i64) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is strictly past its
    /// expiration timestamp. Entries with `expires_at == 0` never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_nanos())
    }

    /// Expiration check against an explicit clock reading.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at > 0 && now > self.expires_at
    }
}

// == Expiration ==
/// Resolves a requested TTL into an absolute expiration timestamp.
///
/// `Ttl::Default` (and a zero duration) falls back to `default_ttl`; a
/// non-positive resolved duration means the entry never expires.
pub fn resolve_expiration(ttl: Ttl, default_ttl: Duration) -> i64 {
    let duration = match ttl {
        Ttl::Never => return 0,
        Ttl::Default => default_ttl,
        Ttl::After(d) if d.is_zero() => default_ttl,
        Ttl::After(d) => d,
    };
    if duration.is_zero() {
        return 0;
    }
    let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
    current_timestamp_nanos().saturating_add(nanos)
}

// == Utility Functions ==
/// Returns current Unix timestamp in nanoseconds.
pub fn current_timestamp_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_never_expires() {
        let entry = StoredEntry::new("v", resolve_expiration(Ttl::Never, Duration::from_secs(60)));

        assert_eq!(entry.expires_at, 0);
        assert!(!entry.is_expired());
        assert!(!entry.is_expired_at(i64::MAX));
    }

    #[test]
    fn test_default_ttl_is_applied() {
        let before = current_timestamp_nanos();
        let expires_at = resolve_expiration(Ttl::Default, Duration::from_secs(60));

        assert!(expires_at >= before + 60_000_000_000);
    }

    #[test]
    fn test_zero_duration_means_default() {
        let before = current_timestamp_nanos();
        let expires_at = resolve_expiration(Ttl::After(Duration::ZERO), Duration::from_secs(5));

        assert!(expires_at >= before + 5_000_000_000);
    }

    #[test]
    fn test_zero_default_never_expires() {
        assert_eq!(resolve_expiration(Ttl::Default, Duration::ZERO), 0);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoredEntry::new(
            "v",
            resolve_expiration(Duration::from_millis(50).into(), Duration::ZERO),
        );

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = StoredEntry::new("v", 1_000);

        // Expired only strictly after the timestamp
        assert!(!entry.is_expired_at(1_000));
        assert!(entry.is_expired_at(1_001));
    }
}
