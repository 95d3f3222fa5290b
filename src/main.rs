//! Recency Cache demo
//!
//! Walks through LRU eviction, TTL expiry and point-in-time lookups against
//! the library, then prints the cache statistics as JSON.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recency_cache::{spawn_cleanup_task, Config, LruCache, SharedCache, VersionedStore};

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache and start the background TTL sweep
/// 4. Run the scenarios and print statistics
/// 5. Stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recency_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recency Cache demo");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, write_policy={}, cleanup_interval={}ms",
        config.capacity, config.write_policy, config.cleanup_interval_ms
    );

    let cache: SharedCache<String> = config.build_cache();
    let cleanup = config
        .cleanup_interval()
        .map(|interval| spawn_cleanup_task(&cache, interval));

    lru_scenario();
    ttl_scenario(&cache).await;
    versioned_scenario();

    let stats = serde_json::to_string_pretty(&cache.stats()).context("failed to encode stats")?;
    println!("{stats}");

    if let Some(cleanup) = cleanup {
        cleanup.stop();
        info!("Background cleanup task stopped");
    }

    info!("Demo complete");
    Ok(())
}

fn lru_scenario() {
    let mut lru = LruCache::new(3);
    lru.put("a", 1);
    lru.put("b", 2);
    lru.put("c", 3);
    lru.get("a");
    lru.put("d", 4);

    println!("LRU keys (most recent first): {:?}", lru.keys());
    println!("LRU get(\"b\") after eviction: {:?}", lru.get("b"));
}

async fn ttl_scenario(cache: &SharedCache<String>) {
    cache.set("session", "token".to_string(), Some(Duration::from_millis(50)));
    cache.set("profile", "alice".to_string(), None);
    println!("TTL get(\"session\") immediately: {:?}", cache.get("session"));

    tokio::time::sleep(Duration::from_millis(60)).await;
    println!("TTL get(\"session\") after 60ms: {:?}", cache.get("session"));
    println!("TTL cache size: {}", cache.len());
}

fn versioned_scenario() {
    let mut prices = VersionedStore::new();
    prices.set("price", "10", 1);
    prices.set("price", "12", 4);

    for at in [0, 1, 3, 4, 100] {
        let value = prices.get("price", at).copied().unwrap_or("");
        println!("price as of {at}: {value:?}");
    }
}
