//! Shared Versioned Store Module
//!
//! Thread-safe handle over a [`VersionedStore`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::versioned::{Version, VersionedStore};

/// Cloneable, thread-safe versioned store.
///
/// Lookups never mutate the store, so they share a read lock; writes take
/// the write lock.
#[derive(Debug)]
pub struct SharedVersionedStore<V> {
    inner: Arc<RwLock<VersionedStore<V>>>,
}

impl<V> Clone for SharedVersionedStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for SharedVersionedStore<V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(VersionedStore::new())),
        }
    }
}

impl<V> SharedVersionedStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: V, timestamp: i64) {
        self.inner.write().set(key, value, timestamp);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn version_count(&self) -> usize {
        self.inner.read().version_count()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<V: Clone> SharedVersionedStore<V> {
    pub fn get(&self, key: &str, timestamp: i64) -> Option<V> {
        self.inner.read().get(key, timestamp).cloned()
    }

    pub fn latest(&self, key: &str) -> Option<V> {
        self.inner.read().latest(key).cloned()
    }

    pub fn history(&self, key: &str) -> Vec<Version<V>> {
        self.inner.read().history(key).to_vec()
    }
}
