//! Health Check and Metrics Endpoints
//!
//! # Endpoints
//!
//! - `GET /health` - JSON health status with integration flags
//! - `GET /healthz` - liveness probe (simple OK)
//! - `GET /metrics` - Prometheus metrics in text format

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infrastructure::metrics::get_metrics_handle;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Bot version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Outbound integrations.
    pub integrations: IntegrationStatus,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every API is configured.
    Healthy,
    /// Running, with some APIs missing credentials.
    Degraded,
}

/// Which outbound APIs have credentials.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IntegrationStatus {
    /// YouTube Data API key set.
    pub youtube: bool,
    /// Gemini API key set.
    pub gemini: bool,
    /// Naver client id and secret set.
    pub naver: bool,
    /// Scheduled run endpoint is guarded.
    pub cron_secret: bool,
}

impl IntegrationStatus {
    const fn all_configured(self) -> bool {
        self.youtube && self.gemini && self.naver
    }
}

/// Shared state of the health endpoints.
pub struct HealthState {
    version: String,
    started_at: Instant,
    integrations: IntegrationStatus,
}

impl HealthState {
    /// Create health state.
    #[must_use]
    pub fn new(version: impl Into<String>, integrations: IntegrationStatus) -> Self {
        Self {
            version: version.into(),
            started_at: Instant::now(),
            integrations,
        }
    }

    fn response(&self) -> HealthResponse {
        HealthResponse {
            status: if self.integrations.all_configured() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            version: self.version.clone(),
            uptime_secs: self.started_at.elapsed().as_secs(),
            current_time: Utc::now(),
            integrations: self.integrations,
        }
    }
}

/// Router with the health and metrics endpoints.
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.response()))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_degrade() {
        let state = HealthState::new(
            "0.1.0",
            IntegrationStatus {
                youtube: true,
                gemini: true,
                naver: false,
                cron_secret: true,
            },
        );
        assert_eq!(state.response().status, HealthStatus::Degraded);
    }

    #[test]
    fn full_credentials_are_healthy() {
        let state = HealthState::new(
            "0.1.0",
            IntegrationStatus {
                youtube: true,
                gemini: true,
                naver: true,
                cron_secret: false,
            },
        );
        let response = state.response();
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.version, "0.1.0");
    }
}
