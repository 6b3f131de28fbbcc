//! Generated articles for running without a proxy.

use chrono::{DateTime, Duration, Utc};

use super::placeholder::PlaceholderSpec;
use super::types::{Article, ArticleSource, UrgentNewsItem};

const MOCK_ARTICLE_COUNT: usize = 10;

const CATEGORIES: &[(&str, [&str; 3])] = &[
  ("general", ["Current Events", "Global News", "Local Updates"]),
  ("business", ["Market Trends", "Start-ups", "Corporate News"]),
  (
    "technology",
    ["Tech Innovations", "Software Updates", "Hardware Reviews"],
  ),
  (
    "entertainment",
    ["Celebrity News", "Film Industry", "Music Releases"],
  ),
  (
    "sports",
    ["Game Results", "Player Transfers", "Tournament Updates"],
  ),
  (
    "science",
    [
      "Research Breakthroughs",
      "Space Exploration",
      "Environmental Studies",
    ],
  ),
  (
    "health",
    ["Medical Advances", "Wellness Tips", "Healthcare Policy"],
  ),
];

fn topics_for(category: &str) -> &'static [&'static str; 3] {
  let category = category.trim().to_lowercase();
  CATEGORIES
    .iter()
    .find(|(name, _)| *name == category)
    .map(|(_, topics)| topics)
    .unwrap_or(&CATEGORIES[0].1)
}

/// Ten articles for a category, newest first, one hour apart.
/// Unknown or empty categories get the general topics.
pub fn headlines(category: &str, now: DateTime<Utc>) -> Vec<Article> {
  let topics = topics_for(category);

  (0..MOCK_ARTICLE_COUNT)
    .map(|i| {
      let n = i + 1;
      let topic = topics[i % topics.len()];
      Article {
        source: ArticleSource {
          id: Some(format!("mock-source-{}", i)),
          name: format!("Mock News Source {}", n),
        },
        author: Some(format!("Author {}", n)),
        title: format!("{}: This is a mock news article title {}", topic, n),
        description: Some(format!(
          "This is a mock description for article {} about {}.",
          n,
          topic.to_lowercase()
        )),
        url: format!("https://example.com/article{}", n),
        image_url: Some(
          PlaceholderSpec::new(800, 400, &format!("Mock News Image {}", n)).to_url(),
        ),
        published_at: Some(now - Duration::hours(i as i64)),
        content: Some(format!(
          "This is the mock content for article {}. It's about {} and is generated for testing purposes when the News API is not available.",
          n,
          topic.to_lowercase()
        )),
      }
    })
    .collect()
}

/// Mock articles whose title or description mention `query`.
/// With no match, the first three general articles.
pub fn search(query: &str, now: DateTime<Utc>) -> Vec<Article> {
  let needle = query.to_lowercase();
  let matches: Vec<Article> = CATEGORIES
    .iter()
    .flat_map(|(category, _)| headlines(category, now))
    .filter(|article| {
      article.title.to_lowercase().contains(&needle)
        || article
          .description
          .as_deref()
          .is_some_and(|d| d.to_lowercase().contains(&needle))
    })
    .collect();

  if matches.is_empty() {
    headlines("general", now).into_iter().take(3).collect()
  } else {
    matches
  }
}

const URGENT_HEADLINES: &[(&str, &str)] = &[
  (
    "Breaking News Alert",
    "This is an urgent news update. The content has been loaded successfully.",
  ),
  (
    "Emergency services respond to major storm",
    "Crews are working through the night as the storm moves inland.",
  ),
  (
    "Alert: transit network suspended",
    "All lines are paused while engineers inspect a signalling fault.",
  ),
];

/// An urgent item that rotates with the clock.
pub fn urgent(now: DateTime<Utc>) -> UrgentNewsItem {
  let index = now.timestamp().rem_euclid(URGENT_HEADLINES.len() as i64) as usize;
  let (title, content) = URGENT_HEADLINES[index];

  UrgentNewsItem {
    id: format!("urgent-mock-{}", index + 1),
    title: title.to_string(),
    content: content.to_string(),
    timestamp: now,
    is_live: true,
    source: "NuFeed".to_string(),
    url: None,
    has_video: false,
    video_url: None,
    video_thumbnail: None,
  }
}
