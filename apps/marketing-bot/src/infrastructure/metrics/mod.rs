//! Prometheus Metrics Module
//!
//! # Metrics Categories
//!
//! - **Crawl**: Videos stored per keyword, cafe posts stored or skipped
//! - **Drafts**: Videos screened and drafts generated
//! - **Outbound**: Retries against YouTube, Gemini and Naver
//!
//! Metrics are exposed at `/metrics` on the HTTP port.

use std::sync::OnceLock;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Returns `None` when another recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                register_metrics();
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Prometheus recorder");
                None
            }
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned().flatten()
}

fn register_metrics() {
    describe_counter!("marketing_videos_crawled_total", "New videos stored by keyword");
    describe_counter!(
        "marketing_videos_screened_total",
        "Videos screened by verdict"
    );
    describe_counter!("marketing_drafts_generated_total", "Mission drafts stored");
    describe_counter!("marketing_cafe_posts_total", "Cafe posts by outcome");
    describe_counter!(
        "marketing_api_retries_total",
        "Outbound API retries by target"
    );
    describe_histogram!(
        "marketing_daily_run_seconds",
        "Duration of the daily auto-mission run"
    );
}

/// Record stored videos.
pub fn record_videos_crawled(keyword: &str, count: usize) {
    counter!("marketing_videos_crawled_total", "keyword" => keyword.to_string())
        .increment(count as u64);
}

/// Record a screening verdict.
pub fn record_screening(vote_worthy: bool) {
    let verdict = if vote_worthy { "worthy" } else { "rejected" };
    counter!("marketing_videos_screened_total", "verdict" => verdict).increment(1);
}

/// Record stored drafts.
pub fn record_drafts(count: usize) {
    counter!("marketing_drafts_generated_total").increment(count as u64);
}

/// Record a cafe post outcome.
pub fn record_cafe_post(saved: bool) {
    let outcome = if saved { "saved" } else { "duplicate" };
    counter!("marketing_cafe_posts_total", "outcome" => outcome).increment(1);
}

/// Record an outbound API retry.
pub fn record_api_retry(target: &str) {
    counter!("marketing_api_retries_total", "target" => target.to_string()).increment(1);
}

/// Record the daily run duration.
pub fn record_daily_run(seconds: f64) {
    histogram!("marketing_daily_run_seconds").record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_videos_crawled("나는솔로", 3);
        record_screening(true);
        record_drafts(2);
        record_cafe_post(false);
        record_api_retry("gemini");
        record_daily_run(1.5);
    }
}
