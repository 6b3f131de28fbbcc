use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub proxy: ProxyConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub retry: RetryConfig,
  #[serde(default)]
  pub urgent: UrgentConfig,
  /// Serve generated articles instead of calling the proxy
  #[serde(default)]
  pub use_mock_data: bool,
  /// Where the cross-session store lives (defaults to the data directory)
  pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
  /// Origin serving `/api/news` and `/api/urgent-news`
  pub base_url: String,
  pub timeout_secs: u64,
}

impl Default for ProxyConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:3000".to_string(),
      timeout_secs: 10,
    }
  }
}

impl ProxyConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Largest TTL chrono can represent in milliseconds.
const MAX_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub ttl_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self { ttl_secs: 5 * 60 }
  }
}

impl CacheConfig {
  pub fn ttl(&self) -> chrono::Duration {
    chrono::Duration::seconds(self.ttl_secs.min(MAX_TTL_SECS) as i64)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  /// Total attempts per request, including the first
  pub max_attempts: u32,
  pub initial_interval_ms: u64,
  pub exponential: bool,
}

impl Default for RetryConfig {
  fn default() -> Self {
    let policy = RetryPolicy::default();
    Self {
      max_attempts: policy.max_attempts,
      initial_interval_ms: policy.initial_interval.as_millis() as u64,
      exponential: policy.exponential,
    }
  }
}

impl RetryConfig {
  pub fn policy(&self) -> RetryPolicy {
    RetryPolicy::new(
      self.max_attempts,
      Duration::from_millis(self.initial_interval_ms),
      self.exponential,
    )
  }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UrgentSource {
  /// Classify the single top general headline
  #[default]
  Headlines,
  /// Read the item served by `/api/urgent-news` as-is
  Endpoint,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrgentConfig {
  #[serde(default)]
  pub source: UrgentSource,
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./nufeed.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/nufeed/config.yaml
  ///
  /// `NUFEED_PROXY_URL` overrides `proxy.base_url` in every case.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Some(url) = Self::proxy_url_override() {
      config.proxy.base_url = url;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("nufeed.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("nufeed").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file is valid and means "all defaults"
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Get the proxy origin from the environment, if set.
  pub fn proxy_url_override() -> Option<String> {
    std::env::var("NUFEED_PROXY_URL")
      .ok()
      .filter(|v| !v.trim().is_empty())
  }
}
