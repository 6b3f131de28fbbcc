//! Wire types for the news proxy.

use serde::{Deserialize, Deserializer};

use super::types::Article;

/// Successful response from the `/api/news` proxy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
  #[serde(default)]
  pub total_results: Option<u64>,
  /// Missing or null is an empty list, not an error
  #[serde(default, deserialize_with = "null_as_empty_vec")]
  pub articles: Vec<Article>,
}

/// Error body the proxy sends with a non-2xx status
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyErrorBody {
  pub error: String,
  #[serde(default)]
  pub details: Option<String>,
}

fn null_as_empty_vec<'de, D>(deserializer: D) -> Result<Vec<Article>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<Article>>::deserialize(deserializer)?.unwrap_or_default())
}
