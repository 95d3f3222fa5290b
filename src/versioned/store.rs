//! Versioned Store Module
//!
//! Append-mostly key-value history answering "what was the value at time T".

use std::collections::HashMap;

use tracing::trace;

// == Version ==
/// One recorded value and the instant it was written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version<V> {
    pub value: V,
    pub timestamp: i64,
}

// == Versioned Store ==
/// Per-key histories kept sorted by timestamp.
///
/// Writes never replace earlier versions. Out-of-order writes are inserted
/// at their sorted position; writes sharing a timestamp keep arrival order,
/// so the latest write at an instant is the one reads see.
#[derive(Debug)]
pub struct VersionedStore<V> {
    records: HashMap<String, Vec<Version<V>>>,
}

impl<V> Default for VersionedStore<V> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<V> VersionedStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Records `value` for `key` as of `timestamp`.
    pub fn set(&mut self, key: impl Into<String>, value: V, timestamp: i64) {
        let key = key.into();
        let versions = self.records.entry(key).or_default();
        let at = versions.partition_point(|v| v.timestamp <= timestamp);
        if at < versions.len() {
            trace!(timestamp, position = at, "out-of-order write");
        }
        versions.insert(at, Version { value, timestamp });
    }

    // == Get ==
    /// Returns the value with the greatest timestamp not after `timestamp`.
    ///
    /// None if the key is unknown or every version is later than `timestamp`.
    pub fn get(&self, key: &str, timestamp: i64) -> Option<&V> {
        let versions = self.records.get(key)?;
        let after = versions.partition_point(|v| v.timestamp <= timestamp);
        after.checked_sub(1).map(|at| &versions[at].value)
    }

    /// Returns the most recent value regardless of time.
    pub fn latest(&self, key: &str) -> Option<&V> {
        self.records
            .get(key)
            .and_then(|versions| versions.last())
            .map(|version| &version.value)
    }

    /// Every version of `key`, oldest first.
    pub fn history(&self, key: &str) -> &[Version<V>] {
        self.records
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total versions across all keys.
    pub fn version_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
