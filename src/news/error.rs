use thiserror::Error;

use super::api_types::ProxyErrorBody;

/// Why a single proxy request failed.
#[derive(Debug, Error)]
pub enum FetchError {
  /// No response: connection failure or timeout
  #[error("network error: {0}")]
  Network(String),

  /// The proxy answered with a non-2xx status
  #[error("proxy returned {status}: {message}{}", with_details(.details))]
  Status {
    status: u16,
    message: String,
    details: Option<String>,
  },

  /// The body was not the expected JSON shape
  #[error("malformed response: {0}")]
  Payload(#[from] serde_json::Error),
}

impl FetchError {
  /// Build a status error, pulling the message out of the proxy's error body when it has one.
  pub fn from_status(status: u16, body: &[u8]) -> Self {
    match serde_json::from_slice::<ProxyErrorBody>(body) {
      Ok(parsed) => Self::Status {
        status,
        message: parsed.error,
        details: parsed.details,
      },
      Err(_) => Self::Status {
        status,
        message: String::from_utf8_lossy(body).trim().to_string(),
        details: None,
      },
    }
  }

  /// Transport failures and 5xx responses may succeed on a later attempt.
  pub fn is_retryable(&self) -> bool {
    match self {
      Self::Network(_) => true,
      Self::Status { status, .. } => *status >= 500,
      Self::Payload(_) => false,
    }
  }
}

fn with_details(details: &Option<String>) -> String {
  match details {
    Some(d) if !d.is_empty() => format!(" ({})", d),
    _ => String::new(),
  }
}

impl From<reqwest::Error> for FetchError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Self::Network(format!("request timed out: {}", e))
    } else {
      Self::Network(e.to_string())
    }
  }
}

/// The urgent-news fetcher failed and had no saved snapshot to fall back on.
#[derive(Debug, Error)]
pub enum UrgentNewsError {
  #[error("Failed to load urgent news: {0}")]
  Unavailable(#[source] FetchError),
}
