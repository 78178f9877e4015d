//! Health Check and Metrics Endpoints
//!
//! # Endpoints
//!
//! - `GET /health` - JSON health status
//! - `GET /healthz` - liveness probe (simple OK)
//! - `GET /readyz` - readiness probe (storage answers)
//! - `GET /metrics` - Prometheus metrics in text format

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::mission::{MissionFilter, MissionRepository};
use crate::infrastructure::metrics::get_metrics_handle;

// =============================================================================
// Health Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Server version.
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
    /// Everything configured.
    Healthy,
    /// Running, with some integrations disabled.
    Degraded,
    /// Storage does not answer.
    Unhealthy,
}

/// Which integrations are live.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IntegrationStatus {
    /// Emails are delivered rather than logged.
    pub email_delivery: bool,
    /// Cron endpoints accept a shared secret.
    pub cron_secret: bool,
    /// Storage answered a query.
    pub storage: bool,
}

// =============================================================================
// Health State
// =============================================================================

/// Shared state of the health endpoints.
pub struct HealthState {
    version: String,
    started_at: Instant,
    email_delivery: bool,
    cron_secret: bool,
    missions: Arc<dyn MissionRepository>,
}

impl HealthState {
    /// Create health state.
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        email_delivery: bool,
        cron_secret: bool,
        missions: Arc<dyn MissionRepository>,
    ) -> Self {
        Self {
            version: version.into(),
            started_at: Instant::now(),
            email_delivery,
            cron_secret,
            missions,
        }
    }
}

/// Router with the health and metrics endpoints.
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn health_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let response = build_health_response(&state).await;
    let status_code = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    if storage_ready(&state).await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
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

async fn storage_ready(state: &HealthState) -> bool {
    match state.missions.list(&MissionFilter::default()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage readiness check failed");
            false
        }
    }
}

async fn build_health_response(state: &HealthState) -> HealthResponse {
    let integrations = IntegrationStatus {
        email_delivery: state.email_delivery,
        cron_secret: state.cron_secret,
        storage: storage_ready(state).await,
    };
    HealthResponse {
        status: determine_health_status(integrations),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        integrations,
    }
}

fn determine_health_status(integrations: IntegrationStatus) -> HealthStatus {
    if !integrations.storage {
        HealthStatus::Unhealthy
    } else if integrations.email_delivery && integrations.cron_secret {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryMissionRepository;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn integrations(email: bool, cron: bool, storage: bool) -> IntegrationStatus {
        IntegrationStatus {
            email_delivery: email,
            cron_secret: cron,
            storage,
        }
    }

    #[test]
    fn status_follows_integrations() {
        assert_eq!(determine_health_status(integrations(true, true, true)), HealthStatus::Healthy);
        assert_eq!(determine_health_status(integrations(false, true, true)), HealthStatus::Degraded);
        assert_eq!(determine_health_status(integrations(true, true, false)), HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn health_reports_degraded_without_email() {
        let state = Arc::new(HealthState::new(
            "0.1.0",
            false,
            true,
            Arc::new(InMemoryMissionRepository::new()),
        ));
        let response = health_routes(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["integrations"]["storage"], true);
    }

    #[tokio::test]
    async fn readiness_checks_storage() {
        let state = Arc::new(HealthState::new(
            "0.1.0",
            true,
            true,
            Arc::new(InMemoryMissionRepository::new()),
        ));
        let response = health_routes(state)
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
