//! Stub transport and fixtures for fetcher tests.

use chrono::{DateTime, TimeZone, Utc};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::{ManualClock, MemoryStore, NewsCache};

use super::api_types::ArticlesResponse;
use super::client::{NewsTransport, ProxyRequest};
use super::error::FetchError;
use super::service::NewsService;
use super::types::{Article, ArticleSource, UrgentNewsItem};

/// What the stub answers with.
#[derive(Debug, Clone)]
pub enum Reply<T> {
  Ok(T),
  Network,
  Status(u16),
  Malformed,
}

impl<T: Clone> Reply<T> {
  fn resolve(&self) -> Result<T, FetchError> {
    match self {
      Self::Ok(value) => Ok(value.clone()),
      Self::Network => Err(FetchError::Network("connection refused".to_string())),
      Self::Status(status) => Err(FetchError::from_status(
        *status,
        br#"{"error": "News API returned an error"}"#,
      )),
      Self::Malformed => Err(
        serde_json::from_str::<serde_json::Value>("{not json")
          .unwrap_err()
          .into(),
      ),
    }
  }
}

pub struct StubTransport {
  articles: Mutex<Reply<ArticlesResponse>>,
  urgent: Mutex<Reply<UrgentNewsItem>>,
  calls: AtomicUsize,
  requests: Mutex<Vec<ProxyRequest>>,
}

impl StubTransport {
  pub fn returning(articles: Vec<Article>) -> Self {
    Self {
      articles: Mutex::new(Reply::Ok(response(articles))),
      urgent: Mutex::new(Reply::Network),
      calls: AtomicUsize::new(0),
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn set_articles(&self, reply: Reply<ArticlesResponse>) {
    *self.articles.lock().unwrap() = reply;
  }

  pub fn set_urgent(&self, reply: Reply<UrgentNewsItem>) {
    *self.urgent.lock().unwrap() = reply;
  }

  /// Number of network calls made so far.
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn last_request(&self) -> Option<ProxyRequest> {
    self.requests.lock().unwrap().last().cloned()
  }
}

impl NewsTransport for StubTransport {
  fn get_articles<'a>(
    &'a self,
    request: &'a ProxyRequest,
  ) -> BoxFuture<'a, Result<ArticlesResponse, FetchError>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.requests.lock().unwrap().push(request.clone());
    let reply = self.articles.lock().unwrap().resolve();
    Box::pin(async move { reply })
  }

  fn get_urgent(&self) -> BoxFuture<'_, Result<UrgentNewsItem, FetchError>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let reply = self.urgent.lock().unwrap().resolve();
    Box::pin(async move { reply })
  }
}

pub fn response(articles: Vec<Article>) -> ArticlesResponse {
  ArticlesResponse {
    total_results: Some(articles.len() as u64),
    articles,
  }
}

pub fn start_time() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn article(title: &str) -> Article {
  Article {
    source: ArticleSource {
      id: None,
      name: "Wire".to_string(),
    },
    author: None,
    title: title.to_string(),
    description: Some(format!("About {}", title)),
    url: format!("https://news.example.com/{}", title.len()),
    image_url: None,
    published_at: Some(start_time()),
    content: None,
  }
}

pub fn articles(n: usize) -> Vec<Article> {
  (1..=n).map(|i| article(&format!("Story {}", i))).collect()
}

pub struct Fixture {
  pub clock: Arc<ManualClock>,
  pub store: Arc<MemoryStore>,
  pub service: NewsService<StubTransport>,
}

impl Fixture {
  pub fn new(transport: StubTransport) -> Self {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(MemoryStore::new());
    let service = NewsService::new(transport, NewsCache::new(clock.clone()), store.clone());
    Self {
      clock,
      store,
      service,
    }
  }

  pub fn transport(&self) -> &StubTransport {
    &self.service.transport
  }
}
