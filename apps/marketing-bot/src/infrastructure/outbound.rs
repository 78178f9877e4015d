//! Retrying request loop shared by the outbound API clients.

use reqwest::{RequestBuilder, Response};

use pick_server::infrastructure::retry::{
    ErrorCategory, ExponentialBackoff, RetryConfig, categorize_status, retry_after,
};

use crate::infrastructure::metrics;

/// A request that failed after retries.
#[derive(Debug)]
pub(crate) enum OutboundError {
    /// No response was received.
    Transport(String),
    /// The last response had a non-success status.
    Status { status: u16, body: String },
}

/// Send the request built by `build` until it succeeds or retries run out.
///
/// Network errors, 408, 429 and 5xx are retried with exponential backoff;
/// 429 waits for `Retry-After` when given but still spends an attempt.
/// Any other status fails at once.
pub(crate) async fn send_with_retry(
    target: &'static str,
    retry: &RetryConfig,
    build: impl Fn() -> RequestBuilder,
) -> Result<Response, OutboundError> {
    let mut backoff = ExponentialBackoff::new(retry);

    loop {
        let response = match build().send().await {
            Ok(resp) => resp,
            Err(e) => {
                if let Some(delay) = backoff.next_backoff() {
                    tracing::warn!(
                        target_api = target,
                        error = %e,
                        delay_ms = delay.as_millis(),
                        attempt = backoff.attempt(),
                        "Network error, retrying"
                    );
                    metrics::record_api_retry(target);
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(OutboundError::Transport(e.to_string()));
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
            return Err(OutboundError::Status {
                status: status.as_u16(),
                body,
            });
        };
        tracing::warn!(
            target_api = target,
            status = status.as_u16(),
            delay_ms = delay.as_millis(),
            "Request failed, retrying"
        );
        metrics::record_api_retry(target);
        tokio::time::sleep(delay).await;
    }
}
