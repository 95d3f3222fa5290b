//! Entry Store Module
//!
//! Keyed storage for cache entries and their metadata.

use std::collections::hash_map::{HashMap, Iter};
use std::sync::Arc;

use crate::cache::CacheEntry;

// == Entry Store ==
/// Maps keys to entries. Knows nothing about recency or capacity.
#[derive(Debug)]
pub struct EntryStore<V> {
    entries: HashMap<Arc<str>, CacheEntry<V>>,
}

impl<V> Default for EntryStore<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> EntryStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts an entry under its own key, returning any entry it replaced.
    pub fn insert(&mut self, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        self.entries.insert(Arc::clone(&entry.key), entry)
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    pub fn iter(&self) -> Iter<'_, Arc<str>, CacheEntry<V>> {
        self.entries.iter()
    }

    /// Iterates entries that are not expired at `now`.
    pub fn live_entries(&self, now: u64) -> impl Iterator<Item = &CacheEntry<V>> {
        self.entries
            .values()
            .filter(move |entry| !entry.is_expired_at(now))
    }

    // == Expired Keys ==
    /// Collects the keys of every entry expired at `now`.
    pub fn expired_keys(&self, now: u64) -> Vec<Arc<str>> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| Arc::clone(key))
            .collect()
    }

    /// Counts entries expired at `now` without removing them.
    pub fn count_expired(&self, now: u64) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count()
    }
}
