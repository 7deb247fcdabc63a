//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::{Mutex, Weak};
use std::thread;
use std::time::{Duration, Instant};

use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info, trace, warn};

use crate::cache::{lock_state, CacheState};

/// Outcome of a single sweep tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    /// Keep sweeping
    Continue,
    /// The cache was stopped or dropped
    Exit,
}

/// Spawns a background task that periodically removes expired entries.
///
/// If a multi-threaded tokio runtime is current, the sweeper runs as a task
/// on it. Otherwise it gets its own OS thread: a current-thread runtime only
/// polls tasks inside `block_on`, so a task there could stall indefinitely. Either way it holds only a weak
/// reference to the cache state and exits on the first tick after
/// `LruCache::stop()` or after the cache is dropped. There is no handle to
/// join: stopping is cooperative.
///
/// # Arguments
/// * `state` - Weak reference to the cache state
/// * `interval` - Time between sweeps
pub(crate) fn spawn_sweep_task<K, V>(
    state: Weak<Mutex<CacheState<K, V>>>,
    interval: Duration,
) where
    K: Hash + Eq + Send + 'static,
    V: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            info!(
                "Starting TTL sweep task with interval of {} ms",
                interval.as_millis()
            );
            handle.spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                // First tick completes immediately
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    if sweep_once(&state) == Tick::Exit {
                        break;
                    }
                }
            });
        }
        _ => {
            info!(
                "Starting TTL sweep thread with interval of {} ms",
                interval.as_millis()
            );
            let spawned = thread::Builder::new()
                .name("lru-ttl-sweeper".to_string())
                .spawn(move || loop {
                    thread::sleep(interval);
                    if sweep_once(&state) == Tick::Exit {
                        break;
                    }
                });
            if let Err(err) = spawned {
                warn!(
                    "Failed to start TTL sweep thread, expired entries will only be removed on access: {}",
                    err
                );
            }
        }
    }
}

/// Runs one sweep under the cache lock.
fn sweep_once<K, V>(state: &Weak<Mutex<CacheState<K, V>>>) -> Tick
where
    K: Hash + Eq,
{
    let Some(state) = state.upgrade() else {
        debug!("Cache dropped, TTL sweeper exiting");
        return Tick::Exit;
    };

    let removed = {
        let mut guard = lock_state(&state);
        if guard.stopped {
            info!("TTL sweeper stopped");
            return Tick::Exit;
        }
        guard.purge_expired(Instant::now())
    };

    if removed > 0 {
        debug!("TTL sweep: removed {} expired entries", removed);
    } else {
        trace!("TTL sweep: no expired entries found");
    }
    Tick::Continue
}
