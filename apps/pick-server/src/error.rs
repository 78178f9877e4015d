//! Service errors and their HTTP mapping.
//!
//! # HTTP Status Codes
//!
//! | Status | Codes |
//! |--------|-------|
//! | 400 | `INVALID_REQUEST`, `INVALID_PICK` |
//! | 401 | `UNAUTHORIZED` |
//! | 403 | `FORBIDDEN` |
//! | 404 | `NOT_FOUND` |
//! | 409 | `CONFLICT`, `MISSION_CLOSED` |
//! | 501 | `NOT_CONFIGURED` |
//! | 502 | `UPSTREAM_FAILED` |
//! | 500 | `INTERNAL_ERROR`, `EMAIL_FAILED` |

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{EmailError, MarketingBotError};
use crate::domain::mission::MissionError;
use crate::domain::pick::PickError;
use crate::domain::shared::DomainError;

/// Error codes for the pick server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed request or invalid field.
    InvalidRequest,
    /// Pick does not fit the mission.
    InvalidPick,
    /// Missing or wrong credentials.
    Unauthorized,
    /// Caller may not act on the resource.
    Forbidden,
    /// Resource does not exist.
    NotFound,
    /// Conflicts with the current state.
    Conflict,
    /// Mission no longer takes picks.
    MissionClosed,
    /// Feature needs configuration that is missing.
    NotConfigured,
    /// A downstream service failed.
    UpstreamFailed,
    /// Email delivery failed.
    EmailFailed,
    /// Unexpected server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::InvalidPick => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict | Self::MissionClosed => StatusCode::CONFLICT,
            Self::NotConfigured => StatusCode::NOT_IMPLEMENTED,
            Self::UpstreamFailed => StatusCode::BAD_GATEWAY,
            Self::EmailFailed | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidPick => "INVALID_PICK",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::MissionClosed => "MISSION_CLOSED",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::UpstreamFailed => "UPSTREAM_FAILED",
            Self::EmailFailed => "EMAIL_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error returned by a use case.
#[derive(Debug, Clone, Error)]
#[error("[{}] {message}", .code.reason())]
pub struct ServiceError {
    code: ErrorCode,
    message: String,
}

impl ServiceError {
    /// Create a new service error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Not-found shorthand.
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    /// Invalid-request shorthand.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convert to a JSON error body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            success: false,
            error: self.message.clone(),
            code: self.code.reason().to_string(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// Error code string.
    pub code: String,
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        let code = match &err {
            DomainError::InvalidValue { .. } => ErrorCode::InvalidRequest,
            DomainError::NotFound { .. } => ErrorCode::NotFound,
            DomainError::Forbidden { .. } => ErrorCode::Forbidden,
            DomainError::Conflict { .. } => ErrorCode::Conflict,
            DomainError::Storage { .. } => ErrorCode::InternalError,
        };
        Self::new(code, err.to_string())
    }
}

impl From<MissionError> for ServiceError {
    fn from(err: MissionError) -> Self {
        let code = match &err {
            MissionError::InvalidParameters { .. } | MissionError::EpisodeOutOfRange { .. } => {
                ErrorCode::InvalidRequest
            }
            MissionError::NotCreator { .. } => ErrorCode::Forbidden,
            MissionError::InvalidStateTransition { .. } | MissionError::Unsupported { .. } => {
                ErrorCode::Conflict
            }
            MissionError::NotFound { .. } => ErrorCode::NotFound,
        };
        Self::new(code, err.to_string())
    }
}

impl From<PickError> for ServiceError {
    fn from(err: PickError) -> Self {
        let code = match &err {
            PickError::MissionClosed { .. } | PickError::EpisodeNotOpen { .. } => {
                ErrorCode::MissionClosed
            }
            _ => ErrorCode::InvalidPick,
        };
        Self::new(code, err.to_string())
    }
}

impl From<EmailError> for ServiceError {
    fn from(err: EmailError) -> Self {
        Self::new(ErrorCode::EmailFailed, err.to_string())
    }
}

impl From<MarketingBotError> for ServiceError {
    fn from(err: MarketingBotError) -> Self {
        let code = match &err {
            MarketingBotError::NotConfigured(_) => ErrorCode::NotConfigured,
            _ => ErrorCode::UpstreamFailed,
        };
        Self::new(code, err.to_string())
    }
}
