//! Breaking-news detection with a cross-session fallback.
//!
//! The urgent fetcher is the one fetcher that reports total failure: the
//! banner must tell "nothing urgent" apart from "could not check". A
//! failed fetch is answered from the last saved item when there is one.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use url::Url;

use crate::cache::FeedResult;
use crate::config::UrgentSource;

use super::client::{Endpoint, NewsTransport, ProxyRequest};
use super::error::{FetchError, UrgentNewsError};
use super::mock;
use super::placeholder::placeholder_url;
use super::service::NewsService;
use super::types::{Article, UrgentNewsItem};

/// Storage key of the last-known-good urgent item.
pub const URGENT_STORAGE_KEY: &str = "cached_urgent_news";

/// Title words that mark an article as urgent, matched case-insensitively.
pub const URGENT_KEYWORDS: [&str; 5] = ["breaking", "urgent", "emergency", "alert", "crisis"];

const DEFAULT_URGENT_CONTENT: &str = "Breaking news update";
const DEFAULT_URGENT_SOURCE: &str = "News Alert";

pub fn is_urgent(title: &str) -> bool {
  let title = title.to_lowercase();
  URGENT_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}

/// Heuristic: an article with an image and a URL whose URL or content
/// mentions "video". Also used as the live flag, which it does not prove.
pub fn has_video(article: &Article) -> bool {
  let has_image = article
    .image_url
    .as_deref()
    .is_some_and(|u| !u.trim().is_empty());
  let has_url = !article.url.trim().is_empty();

  has_image
    && has_url
    && (article.url.contains("video")
      || article
        .content
        .as_deref()
        .is_some_and(|c| c.contains("video")))
}

/// Relative paths and URLs on `origin` can be loaded directly.
fn is_same_origin(image_url: &str, origin: Option<&Url>) -> bool {
  match Url::parse(image_url) {
    // No scheme: a path on the page's own origin
    Err(url::ParseError::RelativeUrlWithoutBase) => !image_url.starts_with("//"),
    Err(_) => false,
    Ok(parsed) => origin.is_some_and(|o| parsed.origin() == o.origin()),
  }
}

fn same_origin_or_placeholder(image_url: &str, title: &str, origin: Option<&Url>) -> String {
  if is_same_origin(image_url, origin) {
    image_url.to_string()
  } else {
    placeholder_url(title)
  }
}

/// Thumbnail for a video item. External images are swapped for a placeholder.
pub fn safe_thumbnail(article: &Article, origin: Option<&Url>) -> Option<String> {
  let image_url = article.image_url.as_deref()?;
  Some(same_origin_or_placeholder(image_url, &article.title, origin))
}

/// Apply the thumbnail rule to an item built elsewhere.
pub fn sanitize_item(mut item: UrgentNewsItem, origin: Option<&Url>) -> UrgentNewsItem {
  if let Some(thumbnail) = item.video_thumbnail.take() {
    item.video_thumbnail = Some(same_origin_or_placeholder(&thumbnail, &item.title, origin));
  }
  item
}

/// Build the ticker item for an article already classified as urgent.
pub fn to_urgent_item(article: &Article, origin: Option<&Url>, now: DateTime<Utc>) -> UrgentNewsItem {
  let video = has_video(article);

  let content = [article.description.as_deref(), article.content.as_deref()]
    .into_iter()
    .flatten()
    .find(|text| !text.trim().is_empty())
    .unwrap_or(DEFAULT_URGENT_CONTENT)
    .to_string();

  let source = if article.source.name.trim().is_empty() {
    DEFAULT_URGENT_SOURCE.to_string()
  } else {
    article.source.name.clone()
  };

  UrgentNewsItem {
    id: format!("urgent-{}", now.timestamp_millis()),
    title: article.title.clone(),
    content,
    timestamp: article.published_at.unwrap_or(now),
    is_live: video,
    source,
    url: Some(article.url.clone()).filter(|u| !u.is_empty()),
    has_video: video,
    video_url: video.then(|| article.url.clone()),
    video_thumbnail: if video {
      safe_thumbnail(article, origin)
    } else {
      None
    },
  }
}

impl<T: NewsTransport> NewsService<T> {
  /// Fetch the current urgent item, if any.
  ///
  /// `Ok` with `data: None` means the check succeeded and nothing is urgent.
  /// A `Persisted` source means the network failed and the last saved item
  /// is being shown. `Err` means the network failed with nothing saved.
  pub async fn fetch_urgent_news(
    &self,
  ) -> Result<FeedResult<Option<UrgentNewsItem>>, UrgentNewsError> {
    if self.use_mock_data {
      info!("using mock urgent news");
      return Ok(FeedResult::mock(Some(mock::urgent(self.cache().now()))));
    }

    let fetched = match self.urgent_source {
      UrgentSource::Headlines => self.fetch_urgent_headline().await,
      UrgentSource::Endpoint => self
        .transport
        .get_urgent()
        .await
        .map(|item| Some(sanitize_item(item, self.origin.as_ref()))),
    };

    match fetched {
      Ok(item) => {
        if let Some(item) = &item {
          self.save_urgent(item);
        }
        Ok(FeedResult::from_network(item))
      }
      Err(e) => {
        warn!(error = %e, "urgent news fetch failed");
        match self.load_saved_urgent() {
          Some(item) => {
            info!(id = %item.id, "using saved urgent news");
            Ok(FeedResult::persisted(Some(item)))
          }
          None => Err(UrgentNewsError::Unavailable(e)),
        }
      }
    }
  }

  async fn fetch_urgent_headline(&self) -> Result<Option<UrgentNewsItem>, FetchError> {
    let request = ProxyRequest::new(Endpoint::TopHeadlines)
      .param("country", "us")
      .param("category", "general")
      .param("pageSize", 1);

    let response = self.transport.get_articles(&request).await?;

    let Some(article) = response.articles.first() else {
      return Ok(None);
    };
    if !is_urgent(&article.title) {
      return Ok(None);
    }

    Ok(Some(to_urgent_item(
      article,
      self.origin.as_ref(),
      self.cache().now(),
    )))
  }

  fn save_urgent(&self, item: &UrgentNewsItem) {
    let saved = serde_json::to_string(item)
      .map_err(|e| e.to_string())
      .and_then(|json| {
        self
          .store
          .set(URGENT_STORAGE_KEY, &json)
          .map_err(|e| e.to_string())
      });
    if let Err(e) = saved {
      warn!(error = %e, "failed to save urgent news");
    }
  }

  fn load_saved_urgent(&self) -> Option<UrgentNewsItem> {
    let json = match self.store.get(URGENT_STORAGE_KEY) {
      Ok(json) => json?,
      Err(e) => {
        warn!(error = %e, "failed to read saved urgent news");
        return None;
      }
    };

    match serde_json::from_str(&json) {
      Ok(item) => Some(sanitize_item(item, self.origin.as_ref())),
      Err(e) => {
        warn!(error = %e, "discarding unreadable saved urgent news");
        None
      }
    }
  }
}
