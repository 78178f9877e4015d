//! Scheduled-job and dispatch endpoints.
//!
//! Cron callers authenticate with `Authorization: Bearer {CRON_SECRET}` or the
//! scheduler's `x-vercel-cron: 1` header. Errors use a bare `{error}` body.

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::dto::{DigestSlot, MissionNotificationRequest};
use crate::domain::shared::Timestamp;
use crate::error::ServiceError;
use crate::infrastructure::config::Secret;

use super::controller::AppState;
use super::request::DigestQuery;
use super::response::CronErrorBody;

/// Header set by the hosting scheduler on cron invocations.
pub const SCHEDULER_HEADER: &str = "x-vercel-cron";

/// Check cron credentials.
///
/// # Errors
///
/// Returns the 501 or 401 response to send back.
pub fn authorize(headers: &HeaderMap, secret: Option<&Secret>) -> Result<(), Response> {
    if headers
        .get(SCHEDULER_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "1")
    {
        return Ok(());
    }

    let Some(secret) = secret else {
        tracing::warn!("Cron call rejected: CRON_SECRET not configured");
        return Err(CronErrorBody::response(
            StatusCode::NOT_IMPLEMENTED,
            "CRON_SECRET not configured",
        ));
    };

    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if bearer == Some(secret.expose()) {
        Ok(())
    } else {
        tracing::warn!("Cron call rejected: bad credentials");
        Err(CronErrorBody::response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
        ))
    }
}

fn respond<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            let status = e.code().http_status();
            if status.is_server_error() {
                tracing::error!(code = %e.code(), error = %e.message(), "Cron job failed");
            }
            CronErrorBody::response(status, e.message())
        }
    }
}

pub(super) async fn send_mission_notification(
    State(state): State<AppState>,
    Json(request): Json<MissionNotificationRequest>,
) -> Response {
    respond(state.dispatcher.execute(request).await)
}

pub(super) async fn daily_auto_mission(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = authorize(&headers, state.cron_secret.as_ref()) {
        return rejection;
    }
    respond(state.cron.daily_auto_mission().await)
}

pub(super) async fn daily_mission_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DigestQuery>,
) -> Response {
    if let Err(rejection) = authorize(&headers, state.cron_secret.as_ref()) {
        return rejection;
    }
    let slot = match query.slot.as_deref() {
        None => None,
        Some(raw) => match DigestSlot::parse(raw) {
            Some(slot) => Some(slot),
            None => {
                return CronErrorBody::response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid slot: {raw}"),
                );
            }
        },
    };
    respond(state.cron.daily_digest(slot, Timestamp::now()).await)
}

pub(super) async fn match_episode_open(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = authorize(&headers, state.cron_secret.as_ref()) {
        return rejection;
    }
    respond(state.cron.open_match_episodes(Timestamp::now()).await)
}

pub(super) async fn deadline_sweep(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&headers, state.cron_secret.as_ref()) {
        return rejection;
    }
    respond(state.cron.deadline_sweep(Timestamp::now()).await)
}
