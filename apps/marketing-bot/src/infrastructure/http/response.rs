//! HTTP response DTOs.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::prompts::ScreeningVerdict;
use crate::error::{ErrorCode, ServiceError};

/// Acknowledgement of a command without a payload.
#[derive(Debug, Clone, Serialize)]
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

/// Screening result.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenResponse {
    /// Always `true`.
    pub success: bool,
    /// Verdict.
    #[serde(flatten)]
    pub verdict: ScreeningVerdict,
}

/// Error returned by HTTP handlers, rendered as `{success: false, error, code}`.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl ApiError {
    /// Bad request shorthand.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ServiceError::invalid(message))
    }

    /// Unauthorized shorthand.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self(ServiceError::new(ErrorCode::Unauthorized, "Unauthorized"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn api_error_uses_code_status() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::from(ServiceError::new(ErrorCode::UpstreamFailed, "gemini")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
