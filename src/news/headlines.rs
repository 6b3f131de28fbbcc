//! Top-headline fetching.

use tracing::info;

use crate::cache::FeedResult;

use super::cache::NewsQueryKey;
use super::client::{Endpoint, NewsTransport, ProxyRequest};
use super::error::FetchError;
use super::mock;
use super::service::NewsService;
use super::types::Article;

pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parameters for a top-headlines request, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineQuery {
  pub country: String,
  /// Empty means any category
  pub category: String,
  pub page_size: u32,
  /// Free-text filter; empty means none
  pub topic: String,
}

impl Default for HeadlineQuery {
  fn default() -> Self {
    Self {
      country: DEFAULT_COUNTRY.to_string(),
      category: String::new(),
      page_size: DEFAULT_PAGE_SIZE,
      topic: String::new(),
    }
  }
}

impl HeadlineQuery {
  pub fn new() -> Self {
    Self::default()
  }

  /// Blank falls back to the default country.
  pub fn country(mut self, country: &str) -> Self {
    let country = country.trim();
    self.country = if country.is_empty() {
      DEFAULT_COUNTRY.to_string()
    } else {
      country.to_string()
    };
    self
  }

  pub fn category(mut self, category: &str) -> Self {
    self.category = category.trim().to_string();
    self
  }

  pub fn page_size(mut self, page_size: u32) -> Self {
    self.page_size = page_size;
    self
  }

  pub fn topic(mut self, topic: &str) -> Self {
    self.topic = topic.trim().to_string();
    self
  }

  /// The proxy request; category and topic are only sent when set.
  pub fn to_request(&self) -> ProxyRequest {
    ProxyRequest::new(Endpoint::TopHeadlines)
      .param("country", &self.country)
      .param("pageSize", self.page_size)
      .param_if_present("category", &self.category)
      .param_if_present("q", &self.topic)
  }
}

impl<T: NewsTransport> NewsService<T> {
  /// Fetch top headlines. Never fails: errors become stale or empty results.
  pub async fn fetch_top_headlines(&self, query: &HeadlineQuery) -> FeedResult<Vec<Article>> {
    if self.use_mock_data {
      info!(category = %query.category, "using mock headlines");
      return FeedResult::mock(mock::headlines(&query.category, self.cache().now()));
    }

    let key = NewsQueryKey::headlines(query);
    let request = query.to_request();

    self
      .articles
      .fetch(&key, || async {
        let response = self.transport.get_articles(&request).await?;
        info!(
          count = response.articles.len(),
          total = ?response.total_results,
          "fetched headlines"
        );
        Ok::<_, FetchError>(response.articles)
      })
      .await
  }
}
