//! Core types shared by the cache and the fetchers.

use chrono::{DateTime, Utc};

/// Result from a fetch, including data and metadata about the source.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: FeedSource,
  /// When the in-memory cache stored the data; `None` for every other source
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> FeedResult<T> {
  /// Create a new result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: FeedSource::Network,
      cached_at: None,
    }
  }

  /// Create a new result from the in-memory cache.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>, is_stale: bool) -> Self {
    Self {
      data,
      source: if is_stale {
        FeedSource::CacheStale
      } else {
        FeedSource::CacheFresh
      },
      cached_at: Some(cached_at),
    }
  }

  /// Create a new result from cross-session storage.
  pub fn persisted(data: T) -> Self {
    Self {
      data,
      source: FeedSource::Persisted,
      cached_at: None,
    }
  }

  /// Create a new result from generated mock data.
  pub fn mock(data: T) -> Self {
    Self {
      data,
      source: FeedSource::Mock,
      cached_at: None,
    }
  }

  /// True when the data did not come from a live response or a fresh cache entry.
  pub fn is_degraded(&self) -> bool {
    matches!(
      self.source,
      FeedSource::CacheStale | FeedSource::Persisted | FeedSource::Mock
    )
  }
}

impl<T: Default> FeedResult<T> {
  /// Nothing fresh, nothing cached.
  pub fn empty() -> Self {
    Self {
      data: T::default(),
      source: FeedSource::Empty,
      cached_at: None,
    }
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still considered fresh
  CacheFresh,
  /// Data from cache past its TTL, served because the network fetch failed
  CacheStale,
  /// Last-known-good snapshot from cross-session storage
  Persisted,
  /// Generated mock data
  Mock,
  /// Network failed and nothing was cached
  Empty,
}

impl std::fmt::Display for FeedSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::Network => "live",
      Self::CacheFresh => "cached",
      Self::CacheStale => "stale cache",
      Self::Persisted => "saved snapshot",
      Self::Mock => "mock data",
      Self::Empty => "unavailable",
    };
    f.write_str(label)
  }
}

/// Which independent cache namespace a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
  Headlines,
  Search,
}

/// Trait for structured cache keys.
///
/// Identical parameter tuples must produce identical `parts`. The cache
/// compares the parts themselves, so two tuples whose joined form happens to
/// match still land in different entries.
pub trait QueryKey {
  /// Namespace the key lives in
  fn namespace(&self) -> Namespace;

  /// Ordered key components
  fn parts(&self) -> Vec<String>;

  /// Dash-joined form of the key, for logs and display
  fn canonical(&self) -> String {
    self.parts().join("-")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_degraded_sources() {
    let now = Utc::now();
    assert!(!FeedResult::from_network(1).is_degraded());
    assert!(!FeedResult::from_cache(1, now, false).is_degraded());
    assert!(FeedResult::from_cache(1, now, true).is_degraded());
    assert!(FeedResult::persisted(1).is_degraded());
    assert!(FeedResult::mock(1).is_degraded());
    assert!(!FeedResult::<Vec<i32>>::empty().is_degraded());
  }

  #[test]
  fn test_only_cache_results_carry_cached_at() {
    let now = Utc::now();
    assert_eq!(FeedResult::from_cache(1, now, false).cached_at, Some(now));
    assert_eq!(FeedResult::from_cache(1, now, true).cached_at, Some(now));
    assert_eq!(FeedResult::from_network(1).cached_at, None);
    assert_eq!(FeedResult::persisted(1).cached_at, None);
    assert_eq!(FeedResult::mock(1).cached_at, None);
  }

  #[test]
  fn test_empty_has_default_data() {
    let result: FeedResult<Vec<i32>> = FeedResult::empty();
    assert!(result.data.is_empty());
    assert_eq!(result.source, FeedSource::Empty);
  }
}
