//! Free-text search over the `everything` endpoint.

use std::str::FromStr;
use tracing::info;

use crate::cache::FeedResult;

use super::cache::NewsQueryKey;
use super::client::{Endpoint, NewsTransport, ProxyRequest};
use super::error::FetchError;
use super::mock;
use super::service::NewsService;
use super::types::Article;

/// Sent in place of a blank search, which the upstream API rejects.
pub const DEFAULT_SEARCH_QUERY: &str = "latest news";
/// Sent in place of a blank `fetch_everything` query.
pub const DEFAULT_EVERYTHING_QUERY: &str = "news";

/// Trim the query and substitute the default for blank input.
pub fn normalize_query(query: &str) -> String {
  let trimmed = query.trim();
  if trimmed.is_empty() {
    DEFAULT_SEARCH_QUERY.to_string()
  } else {
    trimmed.to_string()
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
  Relevancy,
  Popularity,
  #[default]
  PublishedAt,
}

impl SortBy {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Relevancy => "relevancy",
      Self::Popularity => "popularity",
      Self::PublishedAt => "publishedAt",
    }
  }
}

impl FromStr for SortBy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "relevancy" => Ok(Self::Relevancy),
      "popularity" => Ok(Self::Popularity),
      "publishedat" | "published-at" | "published_at" => Ok(Self::PublishedAt),
      other => Err(format!(
        "unknown sort order '{}', expected relevancy, popularity or publishedAt",
        other
      )),
    }
  }
}

/// Parameters for an uncached `everything` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EverythingQuery {
  pub q: String,
  pub page_size: u32,
  pub page: u32,
  pub language: String,
  pub sort_by: SortBy,
}

impl Default for EverythingQuery {
  fn default() -> Self {
    Self {
      q: String::new(),
      page_size: 10,
      page: 1,
      language: "en".to_string(),
      sort_by: SortBy::default(),
    }
  }
}

impl EverythingQuery {
  pub fn to_request(&self) -> ProxyRequest {
    let q = self.q.trim();
    ProxyRequest::new(Endpoint::Everything)
      .param(
        "q",
        if q.is_empty() {
          DEFAULT_EVERYTHING_QUERY
        } else {
          q
        },
      )
      .param("pageSize", self.page_size)
      .param("page", self.page)
      .param("language", &self.language)
      .param("sortBy", self.sort_by.as_str())
  }
}

impl<T: NewsTransport> NewsService<T> {
  /// Search articles. Never fails: errors become stale or empty results.
  pub async fn search_news(&self, query: &str, page_size: u32) -> FeedResult<Vec<Article>> {
    let query = normalize_query(query);

    if self.use_mock_data {
      info!(query = %query, "using mock search data");
      return FeedResult::mock(mock::search(&query, self.cache().now()));
    }

    let key = NewsQueryKey::search(&query, page_size);
    let request = ProxyRequest::new(Endpoint::Everything)
      .param("q", &query)
      .param("pageSize", page_size);

    self
      .articles
      .fetch(&key, || async {
        let response = self.transport.get_articles(&request).await?;
        info!(
          query = %query,
          count = response.articles.len(),
          total = ?response.total_results,
          "fetched search results"
        );
        Ok::<_, FetchError>(response.articles)
      })
      .await
  }

  /// Page through `everything` with language and sort options.
  ///
  /// Unlike the feed fetchers this is uncached and reports failures.
  pub async fn fetch_everything(&self, query: &EverythingQuery) -> Result<Vec<Article>, FetchError> {
    let response = self.transport.get_articles(&query.to_request()).await?;
    Ok(response.articles)
  }
}
