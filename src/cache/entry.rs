//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::clock::duration_to_ms_ceil;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The key this entry is stored under, shared with the store and the
    /// recency index
    pub key: Arc<str>,
    /// The stored value
    pub value: V,
    /// Timestamp of the last write (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Successful primary reads since the entry was created
    pub hit_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry written at `now`.
    ///
    /// A `ttl` of `None` or zero means the entry never expires. Fractions of
    /// a millisecond round up.
    pub fn new(key: impl Into<Arc<str>>, value: V, ttl: Option<Duration>, now: u64) -> Self {
        Self {
            key: key.into(),
            value,
            created_at: now,
            expires_at: expiry_for(ttl, now),
            hit_count: 0,
        }
    }

    // == Rewrite ==
    /// Replaces the value in place and restarts the TTL from `now`.
    ///
    /// The hit count survives the rewrite.
    pub fn rewrite(&mut self, value: V, ttl: Option<Duration>, now: u64) {
        self.value = value;
        self.created_at = now;
        self.expires_at = expiry_for(ttl, now);
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is expired once `now` reaches
    /// `expires_at`, so a read exactly one TTL after the write misses.
    pub fn is_expired_at(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired (TTL elapsed)
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining_ms(&self, now: u64) -> Option<u64> {
        self.expires_at.map(|expires| expires.saturating_sub(now))
    }

    pub(crate) fn record_hit(&mut self) {
        self.hit_count = self.hit_count.saturating_add(1);
    }
}

// == Utility Functions ==
/// Maps a signed millisecond TTL onto the optional-duration form.
///
/// Zero and negative values mean "never expires".
pub fn ttl_from_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}

fn expiry_for(ttl: Option<Duration>, now: u64) -> Option<u64> {
    ttl.filter(|ttl| !ttl.is_zero())
        .map(|ttl| now.saturating_add(duration_to_ms_ceil(ttl)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_000_000;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("k", "test_value", None, NOW);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, NOW);
        assert!(entry.expires_at.is_none());
        assert_eq!(entry.hit_count, 0);
        assert!(!entry.is_expired_at(u64::MAX));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("k", 7, Some(Duration::from_secs(60)), NOW);

        assert_eq!(entry.expires_at, Some(NOW + 60_000));
        assert!(!entry.is_expired_at(NOW));
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let entry = CacheEntry::new("k", 7, Some(Duration::ZERO), NOW);
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("k", (), Some(Duration::from_millis(50)), NOW);

        assert!(!entry.is_expired_at(NOW + 49));
        assert!(entry.is_expired_at(NOW + 50), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(NOW + 60));
    }

    #[test]
    fn test_sub_millisecond_ttl_rounds_up() {
        let entry = CacheEntry::new("k", 1, Some(Duration::from_micros(500)), NOW);

        assert_eq!(entry.expires_at, Some(NOW + 1));
        assert!(!entry.is_expired_at(NOW), "Entry must be readable when written");
        assert!(entry.is_expired_at(NOW + 1));
    }

    #[test]
    fn test_fractional_ttl_never_expires_early() {
        let entry = CacheEntry::new("k", 1, Some(Duration::from_micros(1_900)), NOW);

        assert!(!entry.is_expired_at(NOW + 1));
        assert!(entry.is_expired_at(NOW + 2));
    }

    #[test]
    fn test_rewrite_resets_ttl_and_keeps_hits() {
        let mut entry = CacheEntry::new("k", 1, Some(Duration::from_millis(10)), NOW);
        entry.record_hit();

        entry.rewrite(2, None, NOW + 5);
        assert_eq!(entry.value, 2);
        assert_eq!(entry.created_at, NOW + 5);
        assert!(entry.expires_at.is_none());
        assert_eq!(entry.hit_count, 1);

        entry.rewrite(3, Some(Duration::from_millis(10)), NOW + 20);
        assert_eq!(entry.expires_at, Some(NOW + 30));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("k", 0, Some(Duration::from_secs(10)), NOW);

        assert_eq!(entry.ttl_remaining_ms(NOW), Some(10_000));
        assert_eq!(entry.ttl_remaining_ms(NOW + 9_000), Some(1_000));
        assert_eq!(entry.ttl_remaining_ms(NOW + 20_000), Some(0));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new("k", 0, None, NOW);
        assert!(entry.ttl_remaining_ms(NOW).is_none());
    }

    #[test]
    fn test_ttl_from_millis() {
        assert_eq!(ttl_from_millis(250), Some(Duration::from_millis(250)));
        assert_eq!(ttl_from_millis(0), None);
        assert_eq!(ttl_from_millis(-5), None);
    }
}
