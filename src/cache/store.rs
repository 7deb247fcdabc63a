//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the recency list and TTL expiration.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use crate::cache::entry::CacheEntry;
use crate::cache::list::RecencyList;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::spawn_sweep_task;

// == Cache State ==
/// Everything guarded by the cache lock: index, recency list and sweeper flag.
#[derive(Debug)]
pub(crate) struct CacheState<K, V> {
    /// Key to recency list slot
    index: HashMap<K, usize>,
    /// Entries ordered by recency of use
    list: RecencyList<K, V>,
    /// Set by `stop()`, read by the sweeper on every tick
    pub(crate) stopped: bool,
}

impl<K: Hash + Eq, V> CacheState<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            stopped: false,
        }
    }

    fn remove_slot(&mut self, slot: usize) -> Option<CacheEntry<K, V>> {
        let entry = self.list.remove(slot)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    // == Purge Expired ==
    /// Removes every entry that has expired as of `now`.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn purge_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        let mut cursor = self.list.head();
        while let Some(slot) = cursor {
            let Some(entry) = self.list.get(slot) else {
                break;
            };
            // save next link, removal clears it
            cursor = entry.next;
            if entry.is_expired_at(now) && self.remove_slot(slot).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Checks that the index and the list describe the same entries.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let slots = self.list.assert_consistent();
        assert_eq!(slots.len(), self.index.len(), "list and index sizes differ");
        for slot in slots {
            let entry = self.list.get(slot).expect("linked slot must be occupied");
            assert_eq!(self.index.get(&entry.key), Some(&slot));
        }
    }
}

/// Acquires the cache lock, recovering the state if a previous holder panicked.
///
/// Every critical section leaves the index and list consistent before it can
/// panic, so the state behind a poisoned lock is still usable.
pub(crate) fn lock_state<K, V>(
    state: &Mutex<CacheState<K, V>>,
) -> MutexGuard<'_, CacheState<K, V>> {
    state.lock().unwrap_or_else(|poisoned| {
        warn!("Cache lock was poisoned, recovering state");
        poisoned.into_inner()
    })
}

// == LRU Cache ==
/// Thread-safe, capacity-bounded cache with LRU eviction and optional TTL.
///
/// All operations take one exclusive lock, including `get`, which reorders
/// the recency list. Share a cache between threads with `Arc<LruCache<K, V>>`.
///
/// When a TTL is set, expired entries are removed lazily by `get` and eagerly
/// by a background sweeper until `stop()` is called or the cache is dropped.
/// Expired entries not yet swept still count toward `size()` and capacity.
pub struct LruCache<K, V> {
    /// Shared state; the sweeper holds only a weak reference
    state: Arc<Mutex<CacheState<K, V>>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Configured TTL in seconds, 0 = disabled
    ttl_seconds: i64,
    /// TTL applied to every write, None = disabled
    ttl: Option<Duration>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates a new cache with TTL support disabled.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        Self::try_new(capacity).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Creates a new cache whose entries expire `ttl_seconds` after their last write.
    ///
    /// A `ttl_seconds` of 0 disables expiration and no sweeper is started.
    ///
    /// # Panics
    /// Panics if `capacity` is 0 or `ttl_seconds` is negative.
    pub fn with_ttl(capacity: usize, ttl_seconds: i64) -> Self {
        Self::try_with_ttl(capacity, ttl_seconds).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Fallible version of [`LruCache::new`].
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity, 0))
    }

    /// Fallible version of [`LruCache::with_ttl`].
    pub fn try_with_ttl(capacity: usize, ttl_seconds: i64) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity, ttl_seconds))
    }

    /// Creates a cache from a validated configuration.
    ///
    /// Starts the background sweeper when the configured TTL is positive.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        let cache = Self {
            state: Arc::new(Mutex::new(CacheState::new())),
            capacity: config.capacity,
            ttl_seconds: config.ttl_seconds,
            ttl: config.ttl(),
        };

        if cache.ttl.is_some() {
            spawn_sweep_task(Arc::downgrade(&cache.state), config.sweep_interval());
        }

        Ok(cache)
    }

    // == Get ==
    /// Returns a clone of the value for `key` and marks it most recently used.
    ///
    /// Returns None if the key is absent. An expired entry is removed and
    /// reported as absent.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut state = lock_state(&self.state);
        let slot = *state.index.get(key)?;

        if self.ttl.is_some() {
            let expired = state
                .list
                .get(slot)
                .map_or(false, |entry| entry.is_expired_at(Instant::now()));
            if expired {
                state.remove_slot(slot);
                trace!("Lazily expired entry on read");
                return None;
            }
        }

        state.list.touch(slot);
        state.list.get(slot).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores a value for `key` and marks it most recently used.
    ///
    /// Overwriting an existing key restarts its TTL. Inserting a new key into a
    /// full cache evicts the least recently used entry.
    pub fn put(&self, key: K, value: V) {
        let now = Instant::now();
        let mut state = lock_state(&self.state);

        if let Some(&slot) = state.index.get(&key) {
            if let Some(entry) = state.list.get_mut(slot) {
                entry.refresh(value, self.ttl, now);
            }
            state.list.touch(slot);
            return;
        }

        let slot = state
            .list
            .push_front(CacheEntry::new(key.clone(), value, self.ttl, now));
        state.index.insert(key, slot);

        // Over capacity by at most one: evict the tail
        if state.index.len() > self.capacity {
            if let Some(evicted) = state.list.pop_back() {
                state.index.remove(&evicted.key);
                trace!(capacity = self.capacity, "Evicted least recently used entry");
            }
        }
        debug_assert_eq!(state.list.len(), state.index.len());
    }

    // == Remove ==
    /// Removes the entry for `key` and returns its value.
    ///
    /// The stored value is returned even if the entry has expired.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut state = lock_state(&self.state);
        let slot = state.index.remove(key)?;
        state.list.remove(slot).map(|entry| entry.value)
    }

    // == Size ==
    /// Returns the number of entries currently held, including expired
    /// entries that have not been removed yet.
    pub fn size(&self) -> usize {
        lock_state(&self.state).index.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the TTL in seconds, 0 when expiration is disabled.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&self) {
        let mut state = lock_state(&self.state);
        state.list.clear();
        state.index = HashMap::new();
    }

    // == Stop ==
    /// Asks the background sweeper to exit.
    ///
    /// The sweeper sees the request on its next tick and exits; this call does
    /// not wait for it. Calling it again, or on a cache without a TTL, has no
    /// effect. Lazy expiry on `get` keeps working afterwards.
    pub fn stop(&self) {
        lock_state(&self.state).stopped = true;
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        lock_state(&self.state).assert_consistent();
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
