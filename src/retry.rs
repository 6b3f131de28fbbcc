//! Exponential-backoff retry for async operations.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// How many times to attempt an operation and how long to wait in between.
///
/// `max_attempts` counts every call, including the first one. Intervals
/// double after each failed attempt when `exponential` is set, without a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub initial_interval: Duration,
  pub exponential: bool,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      initial_interval: Duration::from_millis(1000),
      exponential: true,
    }
  }
}

impl RetryPolicy {
  pub fn new(max_attempts: u32, initial_interval: Duration, exponential: bool) -> Self {
    Self {
      max_attempts,
      initial_interval,
      exponential,
    }
  }

  /// The waits between consecutive attempts, in order.
  pub fn delays(&self) -> impl Iterator<Item = Duration> {
    let exponential = self.exponential;
    std::iter::successors(Some(self.initial_interval), move |prev| {
      Some(if exponential {
        prev.saturating_mul(2)
      } else {
        *prev
      })
    })
    .take(self.max_attempts.saturating_sub(1) as usize)
  }

  /// Run `operation` until it succeeds or the attempts run out.
  ///
  /// The last error is returned once no attempts remain.
  pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
  {
    self.run_if(operation, |_| true).await
  }

  /// Like [`run`](Self::run), but gives up early on errors `should_retry` rejects.
  pub async fn run_if<T, E, F, Fut, P>(&self, mut operation: F, should_retry: P) -> Result<T, E>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
  {
    let mut delays = self.delays();
    let mut remaining = self.max_attempts.saturating_sub(1);

    loop {
      match operation().await {
        Ok(value) => return Ok(value),
        Err(e) => {
          if !should_retry(&e) {
            return Err(e);
          }
          let Some(delay) = delays.next() else {
            return Err(e);
          };
          info!(error = %e, "Retrying... {} attempts left", remaining);
          remaining -= 1;
          tokio::time::sleep(delay).await;
        }
      }
    }
  }
}

/// Retry `operation` up to `max_attempts` times, starting at `initial_interval_ms`.
#[allow(dead_code)]
pub async fn retry<T, E, F, Fut>(
  operation: F,
  max_attempts: u32,
  initial_interval_ms: u64,
  exponential: bool,
) -> Result<T, E>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
  E: Display,
{
  RetryPolicy::new(
    max_attempts,
    Duration::from_millis(initial_interval_ms),
    exponential,
  )
  .run(operation)
  .await
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};

  #[tokio::test]
  async fn test_succeeds_on_third_attempt() {
    let calls = AtomicU32::new(0);

    let result = retry(
      || async {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n < 3 {
          Err(format!("attempt {} failed", n))
        } else {
          Ok(n)
        }
      },
      3,
      1,
      true,
    )
    .await;

    assert_eq!(result, Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_single_attempt_propagates_first_error() {
    let calls = AtomicU32::new(0);

    let result: Result<u32, String> = retry(
      || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err("boom".to_string())
      },
      1,
      1,
      true,
    )
    .await;

    assert_eq!(result, Err("boom".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_returns_last_error_when_exhausted() {
    let calls = AtomicU32::new(0);

    let result: Result<u32, String> = retry(
      || async {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        Err(format!("failure {}", n))
      },
      4,
      1,
      false,
    )
    .await;

    assert_eq!(result, Err("failure 4".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn test_run_if_stops_on_permanent_error() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::new(5, Duration::from_millis(1), true);

    let result: Result<u32, u16> = policy
      .run_if(
        || async {
          calls.fetch_add(1, Ordering::SeqCst);
          Err(404)
        },
        |status| *status >= 500,
      )
      .await;

    assert_eq!(result, Err(404));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_exponential_delays_double_without_cap() {
    let policy = RetryPolicy::new(5, Duration::from_millis(1000), true);
    let delays: Vec<u128> = policy.delays().map(|d| d.as_millis()).collect();
    assert_eq!(delays, vec![1000, 2000, 4000, 8000]);
  }

  #[test]
  fn test_constant_delays() {
    let policy = RetryPolicy::new(3, Duration::from_millis(250), false);
    let delays: Vec<u128> = policy.delays().map(|d| d.as_millis()).collect();
    assert_eq!(delays, vec![250, 250]);
  }

  #[test]
  fn test_single_attempt_has_no_delays() {
    let policy = RetryPolicy::new(1, Duration::from_millis(1000), true);
    assert_eq!(policy.delays().count(), 0);
  }
}
