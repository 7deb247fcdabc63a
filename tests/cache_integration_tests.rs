//! Integration Tests for the Public Cache API
//!
//! Exercises eviction, expiry and sweeper lifecycle through `LruCache` only.

use std::sync::{Arc, Once};
use std::thread::{self, sleep};
use std::time::Duration;

use lru_ttl_cache::{CacheConfig, CacheError, LruCache};

// == Helper Functions ==

static TRACING: Once = Once::new();

/// Routes cache logs to the test output, filtered by RUST_LOG.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "lru_ttl_cache=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn ttl_cache(capacity: usize, ttl_seconds: i64, sweep_interval_ms: u64) -> LruCache<String, u32> {
    init_tracing();
    let config = CacheConfig {
        capacity,
        ttl_seconds,
        sweep_interval_ms,
    };
    LruCache::from_config(&config).expect("valid config")
}

fn key(name: &str) -> String {
    name.to_string()
}

// == Construction ==

#[test]
fn test_construction_reports_configuration() {
    let plain: LruCache<String, u32> = LruCache::new(5);
    assert_eq!(plain.capacity(), 5);
    assert_eq!(plain.ttl_seconds(), 0);

    let zero_ttl: LruCache<String, u32> = LruCache::with_ttl(5, 0);
    assert_eq!(zero_ttl.ttl_seconds(), 0);
    zero_ttl.stop();

    let with_ttl: LruCache<String, u32> = LruCache::with_ttl(5, 30);
    assert_eq!(with_ttl.ttl_seconds(), 30);
    with_ttl.stop();
}

#[test]
fn test_construction_rejects_invalid_configuration() {
    assert_eq!(
        LruCache::<String, u32>::try_new(0).unwrap_err(),
        CacheError::InvalidCapacity(0)
    );
    assert_eq!(
        LruCache::<String, u32>::try_with_ttl(0, 5).unwrap_err(),
        CacheError::InvalidCapacity(0)
    );
    assert_eq!(
        LruCache::<String, u32>::try_with_ttl(3, -2).unwrap_err(),
        CacheError::InvalidTtl(-2)
    );
}

#[test]
#[should_panic(expected = "Invalid capacity")]
fn test_new_with_zero_capacity_panics() {
    let _ = LruCache::<String, u32>::with_ttl(0, 1);
}

// == LRU Behaviour ==

#[test]
fn test_eviction_scenario() {
    init_tracing();
    let cache = LruCache::new(2);

    cache.put(key("A"), 1);
    cache.put(key("B"), 2);
    assert_eq!(cache.get(&key("A")), Some(1));

    cache.put(key("C"), 3);

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.get(&key("B")), None);
    assert_eq!(cache.get(&key("A")), Some(1));
    assert_eq!(cache.get(&key("C")), Some(3));
}

#[test]
fn test_repeated_get_keeps_eviction_order() {
    let cache = LruCache::new(3);

    cache.put(1, "one");
    cache.put(2, "two");
    cache.put(3, "three");

    assert_eq!(cache.get(&3), Some("three"));
    assert_eq!(cache.get(&3), Some("three"));

    // 1 is still the least recently used, then 2
    cache.put(4, "four");
    assert_eq!(cache.get(&1), None);
    cache.put(5, "five");
    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.size(), 3);
}

#[test]
fn test_absent_keys_do_not_change_size() {
    let cache = LruCache::new(4);
    cache.put(key("present"), 1);

    assert_eq!(cache.get(&key("missing")), None);
    assert_eq!(cache.remove(&key("missing")), None);
    assert_eq!(cache.size(), 1);
}

#[test]
fn test_remove_then_reinsert() {
    let cache = LruCache::new(2);

    cache.put(key("a"), 1);
    cache.put(key("b"), 2);
    assert_eq!(cache.remove(&key("a")), Some(1));
    assert_eq!(cache.size(), 1);

    cache.put(key("c"), 3);
    cache.put(key("a"), 4);

    // b was least recently used when a was reinserted
    assert_eq!(cache.get(&key("b")), None);
    assert_eq!(cache.get(&key("a")), Some(4));
    assert_eq!(cache.get(&key("c")), Some(3));
}

#[test]
fn test_clear_keeps_configuration() {
    let cache = ttl_cache(8, 60, 200);
    for i in 0..8 {
        cache.put(format!("key{}", i), i);
    }

    cache.clear();

    assert_eq!(cache.size(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 8);
    assert_eq!(cache.ttl_seconds(), 60);
    cache.stop();
}

// == TTL Expiry ==

#[test]
fn test_lazy_expiry_without_sweep() {
    // Sweeper interval far longer than the test
    let cache = ttl_cache(10, 1, 60_000);
    cache.put(key("k"), 7);
    assert_eq!(cache.get(&key("k")), Some(7));

    sleep(Duration::from_millis(1100));

    assert_eq!(cache.size(), 1, "Expired entry still counted until touched");
    assert_eq!(cache.get(&key("k")), None);
    assert_eq!(cache.size(), 0);
    cache.stop();
}

#[test]
fn test_eager_expiry_converges_to_empty() {
    let cache = ttl_cache(100, 1, 100);
    for i in 0..50 {
        cache.put(format!("key{}", i), i);
    }
    assert_eq!(cache.size(), 50);

    sleep(Duration::from_millis(1600));

    assert_eq!(cache.size(), 0, "Sweeper should remove all expired entries");
    cache.stop();
}

#[test]
fn test_stop_halts_eager_expiry_only() {
    let cache = ttl_cache(10, 1, 100);
    cache.put(key("x"), 1);
    cache.put(key("y"), 2);

    cache.stop();
    sleep(Duration::from_millis(1600));

    assert_eq!(cache.size(), 2, "No sweep after stop");
    assert_eq!(cache.get(&key("x")), None);
    assert_eq!(cache.size(), 1);
}

#[test]
fn test_stop_without_ttl_is_noop() {
    let cache = LruCache::new(2);
    cache.stop();
    cache.stop();

    cache.put(key("a"), 1);
    assert_eq!(cache.get(&key("a")), Some(1));
}

#[tokio::test]
async fn test_sweeper_on_tokio_runtime() {
    let cache = ttl_cache(10, 1, 100);
    cache.put(key("a"), 1);
    cache.put(key("b"), 2);

    tokio::time::sleep(Duration::from_millis(1600)).await;

    assert_eq!(cache.size(), 0);
    cache.stop();
}

// == Concurrency ==

#[test]
fn test_concurrent_disjoint_puts() {
    let cache = Arc::new(LruCache::new(10_000));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..250 {
                    cache.put(format!("t{}-{}", t, i), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    assert_eq!(cache.size(), 2000);
    assert_eq!(cache.get(&key("t3-17")), Some(17));
}

#[test]
fn test_concurrent_mixed_operations_with_sweeper() {
    let cache = Arc::new(ttl_cache(64, 1, 20));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500u32 {
                    let k = format!("k{}", (t * 7 + i) % 100);
                    match i % 3 {
                        0 => cache.put(k, i),
                        1 => {
                            let _ = cache.get(&k);
                        }
                        _ => {
                            let _ = cache.remove(&k);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    assert!(cache.size() <= 64);
    cache.stop();
}

#[test]
fn test_cache_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LruCache<String, u32>>();
}
