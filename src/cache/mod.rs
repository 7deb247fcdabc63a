//! Cache Module
//!
//! Provides the in-memory cache with LRU eviction and TTL expiration.

mod entry;
mod list;
mod store;


pub use store::LruCache;

pub(crate) use store::{lock_state, CacheState};
