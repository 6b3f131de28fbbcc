use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Publisher an article came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
  pub id: Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub name: String,
}

/// A single news article as returned by the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  #[serde(default)]
  pub source: ArticleSource,
  pub author: Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub title: String,
  pub description: Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub url: String,
  #[serde(rename = "urlToImage", alias = "imageUrl")]
  pub image_url: Option<String>,
  /// `None` when upstream sent no usable RFC 3339 timestamp
  #[serde(default, deserialize_with = "lenient_timestamp")]
  pub published_at: Option<DateTime<Utc>>,
  pub content: Option<String>,
}

/// A breaking news item for the urgent ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentNewsItem {
  pub id: String,
  pub title: String,
  pub content: String,
  pub timestamp: DateTime<Utc>,
  #[serde(default)]
  pub is_live: bool,
  pub source: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default)]
  pub has_video: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub video_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub video_thumbnail: Option<String>,
}

/// The upstream API sends `null` for text fields it has no value for.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A missing, null or unparseable timestamp becomes `None` instead of
/// failing the whole response.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
  Ok(
    raw
      .as_ref()
      .and_then(|value| value.as_str())
      .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
      .map(|t| t.with_timezone(&Utc)),
  )
}
