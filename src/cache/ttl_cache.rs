//! TTL Cache Module
//!
//! The cache façade: entry store, recency index and eviction policy behind
//! one operation surface.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::cache::{
    CacheEntry, CacheStats, Capacity, Clock, EntryStore, Evictor, RecencyIndex, SharedCache,
    SystemClock, WritePolicy,
};

/// Upper bound on slots reserved up front, whatever the capacity.
const MAX_PREALLOCATED: usize = 1024;

// == TTL Cache ==
/// Bounded key-value cache with LRU eviction, per-entry TTL and hit counts.
///
/// Expiry is lazy: `get` and `has` remove an expired entry when they meet
/// it, and `cleanup_expired` sweeps everything at once. Whether `set` on an
/// existing key refreshes its recency is fixed per instance by its
/// [`WritePolicy`]; the default leaves recency alone.
#[derive(Debug)]
pub struct TtlCache<V, C = SystemClock> {
    store: EntryStore<V>,
    recency: RecencyIndex<Arc<str>>,
    evictor: Evictor,
    stats: CacheStats,
    clock: C,
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Zero or negative capacity means unbounded. Overwrites keep their
    /// recency position.
    pub fn new(capacity: i64) -> Self {
        CacheBuilder::new(capacity).build()
    }
}

impl<V, C: Clock> TtlCache<V, C> {
    pub fn with_parts(capacity: Capacity, write_policy: WritePolicy, clock: C) -> Self {
        let reserve = capacity.limit().unwrap_or(0).min(MAX_PREALLOCATED);
        Self {
            store: EntryStore::with_capacity(reserve),
            recency: RecencyIndex::with_capacity(reserve),
            evictor: Evictor::new(capacity, write_policy),
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// A `ttl` of `None` or zero means the entry never expires. Overwriting
    /// replaces the value and restarts the TTL from now.
    ///
    /// Returns true if a new entry was added, false if an existing one was
    /// updated. Adding to a full cache first evicts the least recently used
    /// entry.
    pub fn set(&mut self, key: impl Into<Arc<str>>, value: V, ttl: Option<Duration>) -> bool {
        let key: Arc<str> = key.into();
        let now = self.clock.now_ms();

        if let Some(entry) = self.store.get_mut(&key) {
            entry.rewrite(value, ttl, now);
            self.evictor.on_rewrite(&mut self.recency, &key);
            return false;
        }

        let evicted = self.evictor.make_room(&mut self.store, &mut self.recency);
        self.stats.record_evictions(evicted);

        self.recency.push_back(Arc::clone(&key));
        self.store.insert(CacheEntry::new(key, value, ttl, now));
        true
    }

    // == Get ==
    /// Retrieves a value, counting a hit and marking it most recently used.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        if self.expire(key) {
            self.stats.record_miss();
            return None;
        }

        let Some(entry) = self.store.get_mut(key) else {
            trace!(key = %key, "cache miss");
            self.stats.record_miss();
            return None;
        };

        entry.record_hit();
        self.recency.touch(key);
        self.stats.record_hit();
        trace!(key = %key, hits = entry.hit_count, "cache hit");
        Some(&entry.value)
    }

    // == Has ==
    /// Checks for a live entry without counting a hit or touching recency.
    ///
    /// An expired entry is removed, as with `get`.
    pub fn has(&mut self, key: &str) -> bool {
        !self.expire(key) && self.store.contains(key)
    }

    // == Delete ==
    /// Removes an entry, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.recency.remove(key);
        self.store.remove(key).is_some()
    }

    // == Peek ==
    /// Reads a live value without changing anything.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entry(key).map(|entry| &entry.value)
    }

    /// Checks for a live entry without changing anything.
    pub fn contains(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Returns a live entry with its metadata, without changing anything.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        let now = self.clock.now_ms();
        self.store
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
    }

    // == Clear ==
    /// Removes every entry, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        self.recency.clear();
        self.store.clear()
    }

    /// Returns stored keys from most to least recently used.
    ///
    /// Expired entries not yet removed are included.
    pub fn keys(&self) -> Vec<String> {
        self.recency.iter().rev().map(|key| key.to_string()).collect()
    }

    /// Number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> Capacity {
        self.evictor.capacity()
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.evictor.write_policy()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let removed = self
            .evictor
            .remove_expired(&mut self.store, &mut self.recency, now);
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns a statistics snapshot. Expired entries are counted, not removed.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        CacheStats {
            total_entries: self.store.len(),
            total_hits: self.store.iter().map(|(_, entry)| entry.hit_count).sum(),
            expired_entries: self.store.count_expired(now),
            ..self.stats.clone()
        }
    }

    // == Most Accessed ==
    /// Returns up to `n` live entries with the highest hit counts.
    ///
    /// Ordered by hit count descending, then key ascending.
    pub fn most_accessed(&self, n: usize) -> Vec<&CacheEntry<V>> {
        let now = self.clock.now_ms();
        let mut entries: Vec<_> = self.store.live_entries(now).collect();
        entries.sort_unstable_by(|a, b| {
            b.hit_count
                .cmp(&a.hit_count)
                .then_with(|| a.key.cmp(&b.key))
        });
        entries.truncate(n);
        entries
    }

    fn expire(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        let expired = self
            .evictor
            .expire_if_stale(&mut self.store, &mut self.recency, key, now);
        if expired {
            self.stats.record_expirations(1);
        }
        expired
    }
}

// == Cache Builder ==
/// Chooses capacity, write policy and clock for a new cache.
#[derive(Debug, Clone)]
pub struct CacheBuilder<C = SystemClock> {
    capacity: Capacity,
    write_policy: WritePolicy,
    clock: C,
}

impl CacheBuilder {
    /// Starts a builder; zero or negative capacity means unbounded.
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity: Capacity::from_signed(capacity),
            write_policy: WritePolicy::default(),
            clock: SystemClock::new(),
        }
    }
}

impl<C: Clock> CacheBuilder<C> {
    pub fn capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub fn clock<T: Clock>(self, clock: T) -> CacheBuilder<T> {
        CacheBuilder {
            capacity: self.capacity,
            write_policy: self.write_policy,
            clock,
        }
    }

    pub fn build<V>(self) -> TtlCache<V, C> {
        TtlCache::with_parts(self.capacity, self.write_policy, self.clock)
    }

    /// Builds a cache behind a lock, ready to share between threads.
    pub fn build_shared<V>(self) -> SharedCache<V, C> {
        SharedCache::from_cache(self.build())
    }
}
