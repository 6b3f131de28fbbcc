//! Fetch policy that orchestrates the in-memory cache with network fetching.

use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

use super::store::NewsCache;
use super::traits::{FeedResult, QueryKey};

/// Cache layer that decides when to hit the network.
///
/// This layer sits between the fetchers and the proxy transport, providing
/// transparent caching with stale fallback.
pub struct CacheLayer<V> {
  cache: NewsCache<V>,
}

impl<V: Clone + Default> CacheLayer<V> {
  pub fn new(cache: NewsCache<V>) -> Self {
    Self { cache }
  }

  pub fn cache(&self) -> &NewsCache<V> {
    &self.cache
  }

  /// Fetch with a cache-first strategy. Never fails.
  ///
  /// 1. Check cache - if fresh, return immediately
  /// 2. Otherwise fetch from network and cache the result
  /// 3. On network failure, return the stale entry if one exists
  /// 4. With nothing cached, return an empty result
  pub async fn fetch<K, F, Fut, E>(&self, key: &K, fetcher: F) -> FeedResult<V>
  where
    K: QueryKey,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
    E: Display,
  {
    let canonical = key.canonical();

    if let Some(entry) = self.cache.get(key) {
      debug!(key = %canonical, namespace = ?key.namespace(), "cache hit");
      return FeedResult::from_cache(entry.data, entry.timestamp, false);
    }

    match fetcher().await {
      Ok(data) => {
        self.cache.put(key, data.clone());
        FeedResult::from_network(data)
      }
      Err(e) => {
        warn!(key = %canonical, error = %e, "fetch failed");
        match self.cache.get_stale(key) {
          Some(entry) => {
            warn!(key = %canonical, cached_at = %entry.timestamp, "using stale cache");
            FeedResult::from_cache(entry.data, entry.timestamp, true)
          }
          None => FeedResult::empty(),
        }
      }
    }
  }
}

impl<V> Clone for CacheLayer<V> {
  fn clone(&self) -> Self {
    Self {
      cache: self.cache.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::clock::ManualClock;
  use crate::cache::traits::{FeedSource, Namespace};
  use chrono::{Duration, Utc};
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;

  struct Key(&'static str);

  impl QueryKey for Key {
    fn namespace(&self) -> Namespace {
      Namespace::Headlines
    }

    fn parts(&self) -> Vec<String> {
      vec![self.0.to_string()]
    }
  }

  fn setup() -> (Arc<ManualClock>, CacheLayer<Vec<u32>>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let layer = CacheLayer::new(NewsCache::new(clock.clone()));
    (clock, layer)
  }

  #[tokio::test]
  async fn test_second_fetch_hits_cache() {
    let (_clock, layer) = setup();
    let calls = AtomicU32::new(0);

    for _ in 0..2 {
      layer
        .fetch(&Key("k"), || async {
          calls.fetch_add(1, Ordering::SeqCst);
          Ok::<_, String>(vec![1, 2])
        })
        .await;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refetches_after_ttl() {
    let (clock, layer) = setup();

    let first = layer.fetch(&Key("k"), || async { Ok::<_, String>(vec![1]) }).await;
    assert_eq!(first.source, FeedSource::Network);

    clock.advance(Duration::minutes(5));
    let second = layer.fetch(&Key("k"), || async { Ok::<_, String>(vec![2]) }).await;

    assert_eq!(second.source, FeedSource::Network);
    assert_eq!(second.data, vec![2]);
  }

  #[tokio::test]
  async fn test_failure_falls_back_to_stale() {
    let (clock, layer) = setup();
    layer.fetch(&Key("k"), || async { Ok::<_, String>(vec![5]) }).await;
    clock.advance(Duration::minutes(30));

    let result = layer
      .fetch(&Key("k"), || async { Err::<Vec<u32>, _>("offline") })
      .await;

    assert_eq!(result.source, FeedSource::CacheStale);
    assert_eq!(result.data, vec![5]);
    assert!(result.cached_at.is_some());
  }

  #[tokio::test]
  async fn test_failure_without_cache_is_empty() {
    let (_clock, layer) = setup();

    let result = layer
      .fetch(&Key("k"), || async { Err::<Vec<u32>, _>("offline") })
      .await;

    assert_eq!(result.source, FeedSource::Empty);
    assert!(result.data.is_empty());
  }

  #[tokio::test]
  async fn test_failure_does_not_overwrite_cache() {
    let (clock, layer) = setup();
    layer.fetch(&Key("k"), || async { Ok::<_, String>(vec![5]) }).await;
    clock.advance(Duration::minutes(6));

    layer
      .fetch(&Key("k"), || async { Err::<Vec<u32>, _>("offline") })
      .await;

    let entry = layer.cache().get_stale(&Key("k")).expect("entry kept");
    assert_eq!(entry.data, vec![5]);
  }
}
