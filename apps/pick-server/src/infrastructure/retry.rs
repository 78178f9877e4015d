//! Retry policy for outbound HTTP calls.
//!
//! Shared by the Resend and marketing bot clients.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::infrastructure::metrics;

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included.
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Error category for determining retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 429: wait for `Retry-After` or back off.
    RateLimited,
    /// 408 and 5xx.
    Retryable,
    /// Everything else.
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
#[must_use]
pub const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500..=599 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// `Retry-After` in whole seconds, if present.
#[must_use]
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Exponential backoff calculator.
#[derive(Debug)]
pub struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
    jitter: bool,
}

impl ExponentialBackoff {
    /// Backoff with up to 10% random jitter on each delay.
    #[must_use]
    pub const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
            jitter: true,
        }
    }

    /// Backoff with exact delays.
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Attempts made so far.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay before the next attempt, or `None` when attempts are used up.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        if self.jitter {
            let extra = rand::rng().random_range(0.0..=0.1);
            return Some(backoff.mul_f64(1.0 + extra));
        }
        Some(backoff)
    }
}

/// A request that still failed when its attempts ran out.
#[derive(Debug)]
pub enum RetryError {
    /// No response was received.
    Transport(reqwest::Error),
    /// The last response had a non-success status.
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body.
        body: String,
    },
}

/// Send the request built by `build` until it succeeds or attempts run out.
///
/// Transport errors accepted by `retry_transport`, 408, 429 and 5xx are
/// retried with exponential backoff. A 429 waits for `Retry-After` when
/// given, but every retry spends an attempt.
///
/// # Errors
///
/// Returns the last transport error or non-success response.
pub async fn send_with_retry(
    target: &'static str,
    config: &RetryConfig,
    build: impl Fn() -> RequestBuilder + Send,
    retry_transport: impl Fn(&reqwest::Error) -> bool + Send,
) -> Result<Response, RetryError> {
    let mut backoff = ExponentialBackoff::new(config);

    loop {
        let response = match build().send().await {
            Ok(resp) => resp,
            Err(e) => {
                if retry_transport(&e)
                    && let Some(delay) = backoff.next_backoff()
                {
                    tracing::warn!(
                        target_api = target,
                        error = %e,
                        delay_ms = delay.as_millis(),
                        attempt = backoff.attempt(),
                        "Network error, retrying"
                    );
                    metrics::record_http_retry(target);
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(RetryError::Transport(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let wait = retry_after(response.headers());
        let delay = match categorize_status(status) {
            ErrorCategory::RateLimited => backoff.next_backoff().map(|d| wait.unwrap_or(d)),
            ErrorCategory::Retryable => backoff.next_backoff(),
            ErrorCategory::NonRetryable => None,
        };
        let Some(delay) = delay else {
            let body = response.text().await.unwrap_or_default();
            return Err(RetryError::Status { status, body });
        };
        tracing::warn!(
            target_api = target,
            status = status.as_u16(),
            delay_ms = delay.as_millis(),
            attempt = backoff.attempt(),
            "Request failed, retrying"
        );
        metrics::record_http_retry(target);
        tokio::time::sleep(delay).await;
    }
}
