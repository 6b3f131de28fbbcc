mod cache;
mod config;
mod logging;
mod news;
mod retry;

use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;

use crate::cache::{FeedResult, FeedSource};
use crate::news::format::{format_article_line, format_urgent};
use crate::news::{Article, EverythingQuery, HeadlineQuery, NewsService, PlaceholderSpec, SortBy};

#[derive(Parser, Debug)]
#[command(name = "nufeed")]
#[command(about = "News headlines, search and urgent alerts through a news proxy")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/nufeed/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Serve generated articles instead of calling the proxy
  #[arg(long)]
  mock: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Top headlines for a country and category
  Headlines {
    #[arg(long, default_value = "us")]
    country: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value_t = 10)]
    page_size: u32,
    /// Free-text filter within the headlines
    #[arg(long, default_value = "")]
    topic: String,
  },
  /// Search all articles
  Search {
    #[arg(default_value = "")]
    query: String,
    #[arg(long, default_value_t = 10)]
    page_size: u32,
  },
  /// Page through all articles without caching
  Everything {
    #[arg(long, default_value = "")]
    q: String,
    #[arg(long, default_value_t = 10)]
    page_size: u32,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value = "en")]
    language: String,
    #[arg(long, default_value = "publishedAt")]
    sort_by: SortBy,
  },
  /// Current breaking news, if any
  Urgent,
  /// Print a placeholder SVG
  Placeholder {
    /// Caption text
    #[arg(default_value = "Placeholder")]
    text: String,
    /// Parse a placeholder route query string instead, e.g. "width=640&text=Hi"
    #[arg(long, conflicts_with = "text")]
    query: Option<String>,
  },
}

fn print_articles(result: &FeedResult<Vec<Article>>) {
  if result.source == FeedSource::Empty {
    println!("No articles available");
    return;
  }
  println!("{} articles ({})", result.data.len(), result.source);
  let now = Utc::now();
  for article in &result.data {
    println!("{}", format_article_line(article, now));
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  let _log_guard = logging::init();

  let args = Args::parse();

  if let Command::Placeholder { text, query } = &args.command {
    let spec = match query {
      Some(q) => PlaceholderSpec::from_query(q),
      None => PlaceholderSpec::new(300, 200, text),
    };
    print!("{}", spec.render_svg());
    return Ok(());
  }

  let mut config = config::Config::load(args.config.as_deref())?;
  config.use_mock_data |= args.mock;

  let service = NewsService::from_config(&config)?;

  match args.command {
    Command::Headlines {
      country,
      category,
      page_size,
      topic,
    } => {
      let query = HeadlineQuery::new()
        .country(&country)
        .category(&category)
        .page_size(page_size)
        .topic(&topic);
      print_articles(&service.fetch_top_headlines(&query).await);
    }
    Command::Search { query, page_size } => {
      print_articles(&service.search_news(&query, page_size).await);
    }
    Command::Everything {
      q,
      page_size,
      page,
      language,
      sort_by,
    } => {
      let query = EverythingQuery {
        q,
        page_size,
        page,
        language,
        sort_by,
      };
      let articles = service.fetch_everything(&query).await?;
      print_articles(&FeedResult::from_network(articles));
    }
    Command::Urgent => {
      let result = service.fetch_urgent_news().await?;
      match &result.data {
        Some(item) => {
          if result.is_degraded() {
            println!("({})", result.source);
          }
          println!("{}", format_urgent(item, Utc::now()));
        }
        None => println!("No urgent news"),
      }
    }
    Command::Placeholder { .. } => {}
  }

  Ok(())
}
