//! LRU TTL Cache - A thread-safe, bounded in-memory cache
//!
//! Provides O(1) get/put/remove with least-recently-used eviction and
//! optional TTL expiration, enforced lazily on access and eagerly by a
//! background sweeper.
//!
//! # Example
//! ```
//! use lru_ttl_cache::LruCache;
//!
//! let cache = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! assert_eq!(cache.get(&"a"), Some(1));
//!
//! // "b" is now least recently used
//! cache.put("c", 3);
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.size(), 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::LruCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
