//! HTTP response DTOs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Acknowledgement of a command without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    /// Successful acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

/// Result of marking a whole inbox read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    /// Always `true`.
    pub success: bool,
    /// Notifications that changed.
    pub updated: usize,
}

/// Bare `{error}` body of the cron endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronErrorBody {
    /// Reason.
    pub error: String,
}

impl CronErrorBody {
    /// Response with the given status.
    pub fn response(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                error: error.into(),
            }),
        )
            .into_response()
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl ApiError {
    /// Wrap a service error.
    #[must_use]
    pub const fn from_error(error: ServiceError) -> Self {
        Self(error)
    }

    /// Bad request shorthand.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ServiceError::invalid(message))
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.code().http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.0.code(), error = %self.0.message(), "Request failed");
        } else {
            tracing::debug!(code = %self.0.code(), error = %self.0.message(), "Request rejected");
        }
        (status, Json(self.0.to_http_response())).into_response()
    }
}
