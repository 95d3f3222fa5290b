//! Shared Cache Module
//!
//! Thread-safe handle over a [`TtlCache`].

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, TtlCache};

// == Shared Cache ==
/// Cloneable, thread-safe cache handle.
///
/// Every operation takes the same exclusive lock, reads included, because
/// `get` and `has` may remove expired entries and reorder recency. Values
/// come back as clones so no reference escapes the lock.
#[derive(Debug)]
pub struct SharedCache<V, C = SystemClock> {
    inner: Arc<Mutex<TtlCache<V, C>>>,
}

impl<V, C> Clone for SharedCache<V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> SharedCache<V> {
    /// Creates a shared cache; zero or negative capacity means unbounded.
    pub fn new(capacity: i64) -> Self {
        Self::from_cache(TtlCache::new(capacity))
    }
}

impl<V, C: Clock> SharedCache<V, C> {
    pub fn from_cache(cache: TtlCache<V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Runs `f` with exclusive access, for compound operations that must
    /// not interleave with other callers.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut TtlCache<V, C>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    pub fn set(&self, key: impl Into<Arc<str>>, value: V, ttl: Option<Duration>) -> bool {
        self.inner.lock().set(key, value, ttl)
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.lock().has(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().delete(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn clear(&self) -> usize {
        self.inner.lock().clear()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().keys()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn cleanup_expired(&self) -> usize {
        self.inner.lock().cleanup_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub(crate) fn downgrade(&self) -> WeakCache<V, C> {
        WeakCache {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<V: Clone, C: Clock> SharedCache<V, C> {
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    pub fn peek(&self, key: &str) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn most_accessed(&self, n: usize) -> Vec<CacheEntry<V>> {
        self.inner
            .lock()
            .most_accessed(n)
            .into_iter()
            .cloned()
            .collect()
    }
}

// == Weak Cache ==
/// Non-owning reference used by background tasks, so they never keep a
/// dropped cache alive.
#[derive(Debug)]
pub(crate) struct WeakCache<V, C> {
    inner: Weak<Mutex<TtlCache<V, C>>>,
}

impl<V, C> WeakCache<V, C> {
    pub(crate) fn upgrade(&self) -> Option<SharedCache<V, C>> {
        self.inner.upgrade().map(|inner| SharedCache { inner })
    }
}
