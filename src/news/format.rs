use chrono::{DateTime, Utc};

use super::types::{Article, UrgentNewsItem};

const TITLE_WIDTH: usize = 72;

/// Truncate to `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    return s.to_string();
  }
  let end = s
    .char_indices()
    .nth(max_len.saturating_sub(3))
    .map(|(i, _)| i)
    .unwrap_or(s.len());
  format!("{}...", &s[..end])
}

pub fn format_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let elapsed = now.signed_duration_since(published);
  let (days, hours, mins) = (elapsed.num_days(), elapsed.num_hours(), elapsed.num_minutes());
  match () {
    _ if days > 0 => format!("{}d ago", days),
    _ if hours > 0 => format!("{}h ago", hours),
    _ if mins > 0 => format!("{}m ago", mins),
    _ => "just now".to_string(),
  }
}

/// One line per article: age, source and title.
pub fn format_article_line(article: &Article, now: DateTime<Utc>) -> String {
  let source = if article.source.name.is_empty() {
    "unknown"
  } else {
    article.source.name.as_str()
  };
  format!(
    "{:>9}  {:<20}  {}",
    article
      .published_at
      .map(|t| format_age(t, now))
      .unwrap_or_default(),
    truncate(source, 20),
    truncate(&article.title, TITLE_WIDTH)
  )
}

pub fn format_urgent(item: &UrgentNewsItem, now: DateTime<Utc>) -> String {
  let badge = if item.is_live { "LIVE" } else { "URGENT" };
  let mut out = format!(
    "[{}] {} ({}, {})\n{}",
    badge,
    item.title,
    item.source,
    format_age(item.timestamp, now),
    item.content
  );
  if let Some(thumbnail) = &item.video_thumbnail {
    out.push_str(&format!("\nthumbnail: {}", thumbnail));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::news::testing::{article, start_time};
  use chrono::Duration;

  #[test]
  fn test_truncate() {
    assert_eq!(truncate("hello", 5), "hello");
    assert_eq!(truncate("hello world", 8), "hello...");
    assert_eq!(truncate("héllo wörld", 8), "héllo...");
  }

  #[test]
  fn test_format_age() {
    let now = start_time();
    assert_eq!(format_age(now, now), "just now");
    assert_eq!(format_age(now - Duration::seconds(59), now), "just now");
    assert_eq!(format_age(now - Duration::minutes(5), now), "5m ago");
    assert_eq!(format_age(now - Duration::hours(3), now), "3h ago");
    assert_eq!(format_age(now - Duration::days(2), now), "2d ago");
    assert_eq!(format_age(now + Duration::minutes(5), now), "just now");
  }

  #[test]
  fn test_article_line() {
    let mut story = article("Chips get faster");
    story.published_at = Some(start_time() - Duration::hours(1));

    let line = format_article_line(&story, start_time());

    assert!(line.contains("1h ago"));
    assert!(line.contains("Wire"));
    assert!(line.ends_with("Chips get faster"));
  }

  #[test]
  fn test_article_line_without_timestamp() {
    let mut story = article("Undated");
    story.published_at = None;

    let line = format_article_line(&story, start_time());

    assert!(!line.contains("ago"));
    assert!(line.ends_with("Undated"));
  }

  #[test]
  fn test_urgent_badge() {
    let item = crate::news::mock::urgent(start_time());
    let text = format_urgent(&item, start_time());
    assert!(text.starts_with("[LIVE] "));
    assert!(!text.contains("thumbnail"));
  }
}
