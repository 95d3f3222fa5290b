//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::{Clock, SharedCache};

/// Shortest interval the sweep will tick at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

// == Cleanup Handle ==
/// Owns a running cleanup task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct CleanupHandle {
    handle: JoinHandle<()>,
}

impl CleanupHandle {
    /// Stops the task.
    pub fn stop(self) {
        self.handle.abort();
    }

    /// True once the task has exited, either stopped or because the cache
    /// it swept was dropped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// Each tick takes the cache lock, exactly like a foreground call to
/// `cleanup_expired`. The task only holds a weak reference to the cache and
/// exits on the first tick after the last `SharedCache` handle is dropped.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let cache: SharedCache<String> = SharedCache::new(1000);
/// let cleanup = spawn_cleanup_task(&cache, Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup.stop();
/// ```
pub fn spawn_cleanup_task<V, C>(cache: &SharedCache<V, C>, interval: Duration) -> CleanupHandle
where
    V: Send + 'static,
    C: Clock + Send + 'static,
{
    let interval = interval.max(MIN_INTERVAL);
    let weak = cache.downgrade();

    let handle = tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting TTL cleanup task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(cache) = weak.upgrade() else {
                debug!("cache dropped, stopping TTL cleanup task");
                break;
            };
            let removed = cache.cleanup_expired();

            if removed > 0 {
                info!(removed, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    });

    CleanupHandle { handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBuilder, ManualClock};

    fn manual_cache() -> (SharedCache<String, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let cache = CacheBuilder::new(100).clock(clock.clone()).build_shared();
        (cache, clock)
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let (cache, clock) = manual_cache();
        cache.set("expire_soon", "value".to_string(), Some(Duration::from_millis(50)));
        cache.set("forever", "value".to_string(), None);

        let handle = spawn_cleanup_task(&cache, Duration::from_millis(10));

        clock.advance(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(100)).await;

        // len() does not expire lazily, so only the sweep could have removed it
        assert_eq!(cache.len(), 1, "Expired entry should have been cleaned up");
        assert!(cache.contains("forever"));
        assert_eq!(cache.stats().expirations, 1);

        handle.stop();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let (cache, _clock) = manual_cache();
        cache.set("long_lived", "value".to_string(), Some(Duration::from_secs(3600)));

        let handle = spawn_cleanup_task(&cache, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("long_lived"), Some("value".to_string()));

        handle.stop();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_stopped() {
        let (cache, _clock) = manual_cache();
        let handle = spawn_cleanup_task(&cache, Duration::from_secs(1));

        handle.handle.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }

    #[tokio::test]
    async fn test_cleanup_task_exits_when_cache_dropped() {
        let (cache, _clock) = manual_cache();
        let handle = spawn_cleanup_task(&cache, Duration::from_millis(10));

        drop(cache);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished(), "Task should exit once the cache is gone");
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let (cache, clock) = manual_cache();
        cache.set("k", "v".to_string(), Some(Duration::from_millis(1)));
        clock.advance(Duration::from_millis(5));

        let handle = spawn_cleanup_task(&cache, Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(cache.is_empty());
        handle.stop();
    }
}
