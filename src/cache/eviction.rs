//! Eviction Policy Module
//!
//! Decides what leaves the cache: the least recently used entry when a new
//! key would exceed capacity, and any entry whose TTL has elapsed.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{EntryStore, RecencyIndex};
use crate::error::CacheError;

// == Capacity ==
/// Upper bound on the number of entries a cache holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// Never evict for size
    Unbounded,
    /// Evict the LRU entry before exceeding this many entries
    Bounded(NonZeroUsize),
}

impl Capacity {
    /// Interprets a signed capacity, where zero or negative means unbounded.
    pub fn from_signed(capacity: i64) -> Self {
        usize::try_from(capacity)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Capacity::Unbounded, Capacity::Bounded)
    }

    /// Interprets a signed capacity, clamping zero or negative values to 1.
    pub fn clamped(capacity: i64) -> Self {
        let limit = usize::try_from(capacity)
            .ok()
            .and_then(NonZeroUsize::new)
            .unwrap_or(NonZeroUsize::MIN);
        Capacity::Bounded(limit)
    }

    /// Returns the entry limit, or None when unbounded.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Unbounded => None,
            Capacity::Bounded(limit) => Some(limit.get()),
        }
    }

    /// True when `len` entries leave no room for another key.
    pub fn is_full(&self, len: usize) -> bool {
        self.limit().is_some_and(|limit| len >= limit)
    }
}

// == Write Policy ==
/// What a write to an existing key does to its recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WritePolicy {
    /// Overwrites leave recency untouched; only reads refresh an entry.
    #[default]
    KeepPosition,
    /// Overwrites mark the key most recently used, like a read.
    Bump,
}

impl FromStr for WritePolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" | "keep_position" => Ok(WritePolicy::KeepPosition),
            "bump" => Ok(WritePolicy::Bump),
            _ => Err(CacheError::InvalidWritePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::KeepPosition => f.write_str("keep"),
            WritePolicy::Bump => f.write_str("bump"),
        }
    }
}

// == Evictor ==
/// Applies capacity and expiry decisions to a store and its recency index.
///
/// Every removal goes through both structures in the same call, so a key is
/// never visible in one and gone from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evictor {
    capacity: Capacity,
    write_policy: WritePolicy,
}

impl Evictor {
    pub fn new(capacity: Capacity, write_policy: WritePolicy) -> Self {
        Self {
            capacity,
            write_policy,
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    // == Make Room ==
    /// Evicts from the front of the recency index until one more key fits.
    ///
    /// Returns the number of entries evicted.
    pub fn make_room<V>(
        &self,
        store: &mut EntryStore<V>,
        recency: &mut RecencyIndex<Arc<str>>,
    ) -> usize {
        let mut evicted = 0;
        while self.capacity.is_full(store.len()) {
            let Some(key) = recency.pop_front() else {
                break;
            };
            store.remove(&key);
            evicted += 1;
            debug!(key = %key, "evicted least recently used entry");
        }
        evicted
    }

    // == Rewrite ==
    /// Applies the write policy after an existing key was overwritten.
    pub fn on_rewrite(&self, recency: &mut RecencyIndex<Arc<str>>, key: &str) {
        if self.write_policy == WritePolicy::Bump {
            recency.touch(key);
        }
    }

    // == Lazy Expiry ==
    /// Removes `key` if it is present and expired at `now`.
    ///
    /// Returns true when the entry was removed.
    pub fn expire_if_stale<V>(
        &self,
        store: &mut EntryStore<V>,
        recency: &mut RecencyIndex<Arc<str>>,
        key: &str,
        now: u64,
    ) -> bool {
        let stale = store.get(key).is_some_and(|entry| entry.is_expired_at(now));
        if stale {
            store.remove(key);
            recency.remove(key);
            debug!(key = %key, "removed expired entry on access");
        }
        stale
    }

    // == Eager Expiry ==
    /// Removes every entry expired at `now`, returning how many were removed.
    pub fn remove_expired<V>(
        &self,
        store: &mut EntryStore<V>,
        recency: &mut RecencyIndex<Arc<str>>,
        now: u64,
    ) -> usize {
        let expired = store.expired_keys(now);
        for key in &expired {
            store.remove(key);
            recency.remove(&**key);
        }
        expired.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use std::time::Duration;

    fn fill(keys: &[&str], ttl_ms: Option<u64>) -> (EntryStore<u32>, RecencyIndex<Arc<str>>) {
        let mut store = EntryStore::new();
        let mut recency = RecencyIndex::new();
        for key in keys {
            let entry = CacheEntry::new(*key, 0, ttl_ms.map(Duration::from_millis), 0);
            recency.push_back(Arc::clone(&entry.key));
            store.insert(entry);
        }
        (store, recency)
    }

    #[test]
    fn test_capacity_from_signed() {
        assert_eq!(Capacity::from_signed(0), Capacity::Unbounded);
        assert_eq!(Capacity::from_signed(-3), Capacity::Unbounded);
        assert_eq!(Capacity::from_signed(5).limit(), Some(5));
    }

    #[test]
    fn test_capacity_clamped() {
        assert_eq!(Capacity::clamped(0).limit(), Some(1));
        assert_eq!(Capacity::clamped(-10).limit(), Some(1));
        assert_eq!(Capacity::clamped(4).limit(), Some(4));
    }

    #[test]
    fn test_capacity_is_full() {
        assert!(!Capacity::Unbounded.is_full(usize::MAX));
        let three = Capacity::from_signed(3);
        assert!(!three.is_full(2));
        assert!(three.is_full(3));
    }

    #[test]
    fn test_write_policy_parse() {
        assert_eq!("keep".parse::<WritePolicy>().unwrap(), WritePolicy::KeepPosition);
        assert_eq!(" BUMP ".parse::<WritePolicy>().unwrap(), WritePolicy::Bump);
        assert!(matches!(
            "sometimes".parse::<WritePolicy>(),
            Err(CacheError::InvalidWritePolicy(_))
        ));
        assert_eq!(WritePolicy::default(), WritePolicy::KeepPosition);
        assert_eq!(WritePolicy::Bump.to_string(), "bump");
    }

    #[test]
    fn test_make_room_evicts_front() {
        let (mut store, mut recency) = fill(&["a", "b", "c"], None);
        let evictor = Evictor::new(Capacity::from_signed(3), WritePolicy::KeepPosition);

        assert_eq!(evictor.make_room(&mut store, &mut recency), 1);
        assert!(!store.contains("a"));
        assert!(!recency.contains("a"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_make_room_unbounded_never_evicts() {
        let (mut store, mut recency) = fill(&["a", "b", "c"], None);
        let evictor = Evictor::new(Capacity::Unbounded, WritePolicy::KeepPosition);

        assert_eq!(evictor.make_room(&mut store, &mut recency), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_on_rewrite_respects_policy() {
        let (_, mut recency) = fill(&["a", "b"], None);

        Evictor::new(Capacity::Unbounded, WritePolicy::KeepPosition).on_rewrite(&mut recency, "a");
        assert_eq!(recency.peek_front().map(|key| &**key), Some("a"));

        Evictor::new(Capacity::Unbounded, WritePolicy::Bump).on_rewrite(&mut recency, "a");
        assert_eq!(recency.peek_front().map(|key| &**key), Some("b"));
    }

    #[test]
    fn test_expire_if_stale() {
        let (mut store, mut recency) = fill(&["a"], Some(10));
        let evictor = Evictor::new(Capacity::Unbounded, WritePolicy::KeepPosition);

        assert!(!evictor.expire_if_stale(&mut store, &mut recency, "a", 9));
        assert!(store.contains("a"));

        assert!(evictor.expire_if_stale(&mut store, &mut recency, "a", 10));
        assert!(!store.contains("a"));
        assert!(recency.is_empty());

        assert!(!evictor.expire_if_stale(&mut store, &mut recency, "missing", 10));
    }

    #[test]
    fn test_remove_expired() {
        let (mut store, mut recency) = fill(&["a", "b"], Some(10));
        store.insert(CacheEntry::new("c", 0, None, 0));
        recency.push_back(Arc::from("c"));
        let evictor = Evictor::new(Capacity::Unbounded, WritePolicy::KeepPosition);

        assert_eq!(evictor.remove_expired(&mut store, &mut recency, 5), 0);
        assert_eq!(evictor.remove_expired(&mut store, &mut recency, 50), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(recency.iter().map(|key| &**key).collect::<Vec<_>>(), vec!["c"]);
    }
}
