//! Cache keys for news queries.

use crate::cache::{Namespace, QueryKey};

use super::headlines::HeadlineQuery;

/// Query key types for proxy calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewsQueryKey {
  /// Top headlines for a country/category/topic
  Headlines {
    country: String,
    category: String,
    page_size: u32,
    topic: String,
  },
  /// Free-text search, query already normalized
  Search { query: String, page_size: u32 },
}

impl NewsQueryKey {
  pub fn headlines(query: &HeadlineQuery) -> Self {
    Self::Headlines {
      country: query.country.clone(),
      category: query.category.clone(),
      page_size: query.page_size,
      topic: query.topic.clone(),
    }
  }

  pub fn search(normalized_query: &str, page_size: u32) -> Self {
    Self::Search {
      query: normalized_query.to_string(),
      page_size,
    }
  }
}

impl QueryKey for NewsQueryKey {
  fn namespace(&self) -> Namespace {
    match self {
      Self::Headlines { .. } => Namespace::Headlines,
      Self::Search { .. } => Namespace::Search,
    }
  }

  fn parts(&self) -> Vec<String> {
    match self {
      Self::Headlines {
        country,
        category,
        page_size,
        topic,
      } => vec![
        country.clone(),
        category.clone(),
        page_size.to_string(),
        topic.clone(),
      ],
      Self::Search { query, page_size } => vec![query.clone(), page_size.to_string()],
    }
  }
}
