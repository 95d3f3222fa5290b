//! LRU Cache Module
//!
//! Plain capacity-bounded LRU cache with no expiry.

use std::sync::Arc;

use crate::cache::{Capacity, SystemClock, TtlCache, WritePolicy};

// == LRU Cache ==
/// Capacity-bounded cache where both reads and writes refresh recency.
///
/// Capacity is always at least 1: zero or negative values are clamped.
#[derive(Debug)]
pub struct LruCache<V> {
    inner: TtlCache<V, SystemClock>,
}

impl<V> LruCache<V> {
    pub fn new(capacity: i64) -> Self {
        Self {
            inner: TtlCache::with_parts(
                Capacity::clamped(capacity),
                WritePolicy::Bump,
                SystemClock::new(),
            ),
        }
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// Returns true if the key was new.
    pub fn put(&mut self, key: impl Into<Arc<str>>, value: V) -> bool {
        self.inner.set(key, value, None)
    }

    /// Reads a value and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.inner.get(key)
    }

    /// Reads a value without marking it as recently used.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.inner.peek(key)
    }

    /// Checks for a key without marking it as recently used.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.inner.delete(key)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity().limit().unwrap_or(1)
    }
}
