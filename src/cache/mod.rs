//! Cache Module
//!
//! In-memory key-value caching with LRU eviction and TTL expiration.

mod clock;
mod entry;
mod eviction;
mod lru;
mod recency;
mod shared;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{ttl_from_millis, CacheEntry};
pub use eviction::{Capacity, Evictor, WritePolicy};
pub use lru::LruCache;
pub use recency::{Iter as RecencyIter, RecencyIndex};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::EntryStore;
pub use ttl_cache::{CacheBuilder, TtlCache};
