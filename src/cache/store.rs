//! Process-local TTL cache with separate headline and search namespaces.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::clock::Clock;
use super::traits::{Namespace, QueryKey};

/// Default time-to-live for cached responses, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

/// A single cached value.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
  /// The cached value
  pub data: V,
  /// When the value was stored
  pub timestamp: DateTime<Utc>,
}

type Shelf<V> = HashMap<Vec<String>, CacheEntry<V>>;

#[derive(Debug)]
struct Shelves<V> {
  headlines: Shelf<V>,
  search: Shelf<V>,
}

impl<V> Shelves<V> {
  fn shelf(&self, namespace: Namespace) -> &Shelf<V> {
    match namespace {
      Namespace::Headlines => &self.headlines,
      Namespace::Search => &self.search,
    }
  }

  fn shelf_mut(&mut self, namespace: Namespace) -> &mut Shelf<V> {
    match namespace {
      Namespace::Headlines => &mut self.headlines,
      Namespace::Search => &mut self.search,
    }
  }
}

/// In-memory cache shared by the headline and search fetchers.
///
/// Entries are never evicted; a lookup past the TTL behaves as a miss while
/// the entry stays available to `get_stale`. Clones share the same storage.
pub struct NewsCache<V> {
  shelves: Arc<Mutex<Shelves<V>>>,
  clock: Arc<dyn Clock>,
  ttl: Duration,
}

impl<V: Clone> NewsCache<V> {
  /// Create an empty cache with the default TTL.
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self {
      shelves: Arc::new(Mutex::new(Shelves {
        headlines: HashMap::new(),
        search: HashMap::new(),
      })),
      clock,
      ttl: Duration::seconds(DEFAULT_TTL_SECS),
    }
  }

  /// Set the time-to-live for cached entries.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  #[cfg(test)]
  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Current time according to the injected clock.
  pub fn now(&self) -> DateTime<Utc> {
    self.clock.now()
  }

  fn lock(&self) -> MutexGuard<'_, Shelves<V>> {
    self.shelves.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Check if an entry stored at `timestamp` is still fresh.
  pub fn is_fresh(&self, timestamp: DateTime<Utc>) -> bool {
    self.clock.now() - timestamp < self.ttl
  }

  /// Get an entry only if it is younger than the TTL.
  pub fn get<K: QueryKey>(&self, key: &K) -> Option<CacheEntry<V>> {
    self
      .get_stale(key)
      .filter(|entry| self.is_fresh(entry.timestamp))
  }

  /// Get an entry regardless of age.
  pub fn get_stale<K: QueryKey>(&self, key: &K) -> Option<CacheEntry<V>> {
    let shelves = self.lock();
    shelves
      .shelf(key.namespace())
      .get(&key.parts())
      .cloned()
  }

  /// Insert or overwrite an entry stamped with the current time.
  pub fn put<K: QueryKey>(&self, key: &K, data: V) {
    let entry = CacheEntry {
      data,
      timestamp: self.clock.now(),
    };
    let mut shelves = self.lock();
    shelves
      .shelf_mut(key.namespace())
      .insert(key.parts(), entry);
  }

  /// Remove every entry in both namespaces.
  #[allow(dead_code)]
  pub fn clear(&self) {
    let mut shelves = self.lock();
    shelves.headlines.clear();
    shelves.search.clear();
  }

  /// Number of entries held in a namespace, fresh or stale.
  #[cfg(test)]
  pub fn len(&self, namespace: Namespace) -> usize {
    self.lock().shelf(namespace).len()
  }
}

impl<V> Clone for NewsCache<V> {
  fn clone(&self) -> Self {
    Self {
      shelves: Arc::clone(&self.shelves),
      clock: Arc::clone(&self.clock),
      ttl: self.ttl,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::clock::ManualClock;

  struct Key(Namespace, &'static str);

  impl QueryKey for Key {
    fn namespace(&self) -> Namespace {
      self.0
    }

    fn parts(&self) -> Vec<String> {
      vec![self.1.to_string()]
    }
  }

  fn setup() -> (Arc<ManualClock>, NewsCache<Vec<u32>>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let cache = NewsCache::new(clock.clone());
    (clock, cache)
  }

  #[test]
  fn test_get_after_put_returns_value() {
    let (_clock, cache) = setup();
    let key = Key(Namespace::Headlines, "us--10-");

    cache.put(&key, vec![1, 2, 3]);

    let entry = cache.get(&key).expect("fresh entry");
    assert_eq!(entry.data, vec![1, 2, 3]);
  }

  #[test]
  fn test_entry_expires_at_ttl() {
    let (clock, cache) = setup();
    let key = Key(Namespace::Search, "rust-10");
    cache.put(&key, vec![7]);

    clock.advance(cache.ttl() - Duration::milliseconds(1));
    assert!(cache.get(&key).is_some());

    clock.advance(Duration::milliseconds(1));
    assert!(cache.get(&key).is_none());
  }

  #[test]
  fn test_stale_entry_still_available() {
    let (clock, cache) = setup();
    let key = Key(Namespace::Search, "rust-10");
    cache.put(&key, vec![7]);

    clock.advance(Duration::hours(2));

    assert!(cache.get(&key).is_none());
    assert_eq!(cache.get_stale(&key).map(|e| e.data), Some(vec![7]));
  }

  #[test]
  fn test_never_populated_is_none() {
    let (_clock, cache) = setup();
    let key = Key(Namespace::Headlines, "missing");
    assert!(cache.get(&key).is_none());
    assert!(cache.get_stale(&key).is_none());
  }

  #[test]
  fn test_namespaces_are_independent() {
    let (_clock, cache) = setup();
    cache.put(&Key(Namespace::Headlines, "same"), vec![1]);
    cache.put(&Key(Namespace::Search, "same"), vec![2]);

    assert_eq!(
      cache.get(&Key(Namespace::Headlines, "same")).map(|e| e.data),
      Some(vec![1])
    );
    assert_eq!(
      cache.get(&Key(Namespace::Search, "same")).map(|e| e.data),
      Some(vec![2])
    );
  }

  #[test]
  fn test_put_overwrites_and_restamps() {
    let (clock, cache) = setup();
    let key = Key(Namespace::Headlines, "k");
    cache.put(&key, vec![1]);

    clock.advance(Duration::minutes(4));
    cache.put(&key, vec![2]);
    clock.advance(Duration::minutes(4));

    let entry = cache.get(&key).expect("restamped entry is fresh");
    assert_eq!(entry.data, vec![2]);
  }

  #[test]
  fn test_clear_empties_both_namespaces() {
    let (_clock, cache) = setup();
    cache.put(&Key(Namespace::Headlines, "a"), vec![1]);
    cache.put(&Key(Namespace::Search, "b"), vec![2]);

    cache.clear();

    assert_eq!(cache.len(Namespace::Headlines), 0);
    assert_eq!(cache.len(Namespace::Search), 0);
    assert!(cache.get_stale(&Key(Namespace::Headlines, "a")).is_none());
  }

  #[test]
  fn test_clones_share_storage() {
    let (_clock, cache) = setup();
    let other = cache.clone();
    let key = Key(Namespace::Search, "shared");

    other.put(&key, vec![9]);

    assert!(cache.get(&key).is_some());
  }

  #[test]
  fn test_custom_ttl() {
    let (clock, cache) = setup();
    let cache = cache.with_ttl(Duration::seconds(10));
    let key = Key(Namespace::Headlines, "short");
    cache.put(&key, vec![1]);

    clock.advance(Duration::seconds(10));
    assert!(cache.get(&key).is_none());
  }
}
