//! Recency Cache - an in-process key-value cache
//!
//! Provides LRU eviction, per-entry TTL expiration with hit statistics, and a
//! time-versioned store for point-in-time lookups.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod versioned;

pub use cache::{CacheBuilder, CacheStats, LruCache, SharedCache, TtlCache, WritePolicy};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_cleanup_task, CleanupHandle};
pub use versioned::{SharedVersionedStore, VersionedStore};
