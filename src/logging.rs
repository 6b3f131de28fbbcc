//! Logging setup: stderr plus a log file in the data directory

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE: &str = "nufeed.log";

/// Directory holding `nufeed.log`, next to the persistent store.
pub fn log_dir() -> PathBuf {
  dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .unwrap_or_else(|| PathBuf::from("."))
    .join("nufeed")
}

fn filter(default_level: &str) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging to stderr and `nufeed.log`.
///
/// Both outputs read `RUST_LOG`. Without it stderr shows warnings only so
/// command output stays readable, while the file gets `info`.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program.
pub fn init() -> Option<WorkerGuard> {
  let dir = log_dir();
  let file_writer = std::fs::create_dir_all(&dir)
    .ok()
    .and_then(|()| {
      RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&dir)
        .ok()
    })
    .map(tracing_appender::non_blocking);

  let stderr_layer = tracing_subscriber::fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .with_filter(filter("warn"));

  match file_writer {
    Some((non_blocking, guard)) => {
      tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
          tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(filter("info")),
        )
        .init();
      Some(guard)
    }
    None => {
      tracing_subscriber::registry().with(stderr_layer).init();
      None
    }
  }
}
