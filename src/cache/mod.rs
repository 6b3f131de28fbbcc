//! Caching for news responses.
//!
//! This module provides:
//! - An in-memory TTL cache with headline and search namespaces
//! - A cache-first fetch policy that falls back to stale entries on failure
//! - Cross-session key-value storage for last-known-good snapshots
//! - An injectable clock so freshness can be tested deterministically

mod clock;
mod layer;
mod storage;
mod store;
mod traits;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use layer::CacheLayer;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::NewsCache;
pub use traits::{FeedResult, FeedSource, Namespace, QueryKey};
