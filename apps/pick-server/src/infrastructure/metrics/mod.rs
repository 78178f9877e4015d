//! Prometheus Metrics Module
//!
//! # Metrics Categories
//!
//! - **Picks**: Picks and match picks submitted
//! - **Settlement**: Missions settled, points awarded
//! - **Notifications**: In-app notifications created, emails sent or failed
//! - **Cron**: Scheduled job runs
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
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned().flatten()
}

fn register_metrics() {
    describe_counter!("realpick_picks_total", "Picks submitted by mission form");
    describe_counter!("realpick_missions_created_total", "Missions created");
    describe_counter!("realpick_missions_settled_total", "Missions settled by kind");
    describe_counter!(
        "realpick_points_awarded_total",
        "Point ledger entries written by mission type and sign"
    );
    describe_counter!(
        "realpick_notifications_created_total",
        "In-app notifications created by type"
    );
    describe_counter!("realpick_emails_total", "Email deliveries by outcome");
    describe_counter!(
        "realpick_http_retries_total",
        "Outbound HTTP retries by target"
    );
    describe_counter!("realpick_cron_runs_total", "Cron job runs by job and outcome");
    describe_histogram!(
        "realpick_notification_dispatch_seconds",
        "Time to dispatch a mission notification"
    );
}

/// Record a pick submission.
pub fn record_pick(form: &str) {
    counter!("realpick_picks_total", "form" => form.to_string()).increment(1);
}

/// Record a created mission.
pub fn record_mission_created(form: &str) {
    counter!("realpick_missions_created_total", "form" => form.to_string()).increment(1);
}

/// Record a settled mission.
pub fn record_mission_settled(kind: &str) {
    counter!("realpick_missions_settled_total", "kind" => kind.to_string()).increment(1);
}

/// Record a point ledger entry.
pub fn record_points(mission_type: &str, diff: i64) {
    let sign = if diff >= 0 { "gain" } else { "loss" };
    counter!(
        "realpick_points_awarded_total",
        "mission_type" => mission_type.to_string(),
        "sign" => sign
    )
    .increment(1);
}

/// Record created in-app notifications.
pub fn record_notifications(kind: &str, count: usize) {
    counter!("realpick_notifications_created_total", "type" => kind.to_string())
        .increment(count as u64);
}

/// Record one email delivery outcome.
pub fn record_email(success: bool) {
    let outcome = if success { "sent" } else { "failed" };
    counter!("realpick_emails_total", "outcome" => outcome).increment(1);
}

/// Record an outbound HTTP retry.
pub fn record_http_retry(target: &str) {
    counter!("realpick_http_retries_total", "target" => target.to_string()).increment(1);
}

/// Record a cron job run.
pub fn record_cron_run(job: &str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!(
        "realpick_cron_runs_total",
        "job" => job.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record notification dispatch latency.
pub fn record_dispatch_duration(kind: &str, seconds: f64) {
    histogram!(
        "realpick_notification_dispatch_seconds",
        "type" => kind.to_string()
    )
    .record(seconds);
}
