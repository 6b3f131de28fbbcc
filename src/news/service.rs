//! News service that wraps the proxy transport with caching and fallbacks.

use color_eyre::Result;
use std::sync::Arc;
use tracing::warn;
use url::Url;

use crate::cache::{CacheLayer, KeyValueStore, NewsCache, SqliteStore, SystemClock};
use crate::config::{Config, UrgentSource};

use super::client::{NewsTransport, ProxyClient};
use super::types::Article;

/// Entry point for headline, search and urgent-news fetches.
///
/// Cloning is cheap and clones share the same cache. Concurrent identical
/// requests are not coalesced: each one that misses the cache goes to the
/// network.
pub struct NewsService<T> {
  pub(super) transport: Arc<T>,
  pub(super) articles: CacheLayer<Vec<Article>>,
  pub(super) store: Arc<dyn KeyValueStore>,
  pub(super) use_mock_data: bool,
  pub(super) urgent_source: UrgentSource,
  /// Origin images are allowed to come from, besides relative paths
  pub(super) origin: Option<Url>,
}

impl NewsService<ProxyClient> {
  /// Build the production service from configuration.
  pub fn from_config(config: &Config) -> Result<Self> {
    let transport = ProxyClient::new(config)?;
    let origin = transport.base_url().clone();

    let store: Arc<dyn KeyValueStore> = match SqliteStore::open(config.storage_path.as_deref()) {
      Ok(store) => Arc::new(store),
      Err(e) => {
        warn!(error = %e, "persistent store unavailable, urgent news will not survive restarts");
        Arc::new(crate::cache::MemoryStore::new())
      }
    };

    let cache = NewsCache::new(Arc::new(SystemClock)).with_ttl(config.cache.ttl());

    Ok(
      Self::new(transport, cache, store)
        .with_mock_data(config.use_mock_data)
        .with_urgent_source(config.urgent.source)
        .with_origin(origin),
    )
  }
}

impl<T: NewsTransport> NewsService<T> {
  pub fn new(transport: T, cache: NewsCache<Vec<Article>>, store: Arc<dyn KeyValueStore>) -> Self {
    Self {
      transport: Arc::new(transport),
      articles: CacheLayer::new(cache),
      store,
      use_mock_data: false,
      urgent_source: UrgentSource::default(),
      origin: None,
    }
  }

  pub fn with_mock_data(mut self, enabled: bool) -> Self {
    self.use_mock_data = enabled;
    self
  }

  pub fn with_urgent_source(mut self, source: UrgentSource) -> Self {
    self.urgent_source = source;
    self
  }

  pub fn with_origin(mut self, origin: Url) -> Self {
    self.origin = Some(origin);
    self
  }

  /// The in-memory article cache.
  pub fn cache(&self) -> &NewsCache<Vec<Article>> {
    self.articles.cache()
  }
}

impl<T> Clone for NewsService<T> {
  fn clone(&self) -> Self {
    Self {
      transport: Arc::clone(&self.transport),
      articles: self.articles.clone(),
      store: Arc::clone(&self.store),
      use_mock_data: self.use_mock_data,
      urgent_source: self.urgent_source,
      origin: self.origin.clone(),
    }
  }
}
