//! Service errors of the marketing bot.
//!
//! The error type and JSON body are shared with the pick server; this module
//! maps the bot's outbound API errors onto it.
//!
//! | Source | Code |
//! |--------|------|
//! | missing API key | `NOT_CONFIGURED` (501) |
//! | upstream status, transport or decoding | `UPSTREAM_FAILED` (502) |

pub use pick_server::error::{ErrorCode, HttpErrorResponse, ServiceError};

use crate::application::ports::{GeminiError, NaverError, YouTubeError};
use crate::infrastructure::config::ConfigError;

impl From<YouTubeError> for ServiceError {
    fn from(err: YouTubeError) -> Self {
        let code = match &err {
            YouTubeError::NotConfigured => ErrorCode::NotConfigured,
            _ => ErrorCode::UpstreamFailed,
        };
        Self::new(code, err.to_string())
    }
}

impl From<GeminiError> for ServiceError {
    fn from(err: GeminiError) -> Self {
        let code = match &err {
            GeminiError::NotConfigured => ErrorCode::NotConfigured,
            _ => ErrorCode::UpstreamFailed,
        };
        Self::new(code, err.to_string())
    }
}

impl From<NaverError> for ServiceError {
    fn from(err: NaverError) -> Self {
        let code = match &err {
            NaverError::NotConfigured => ErrorCode::NotConfigured,
            _ => ErrorCode::UpstreamFailed,
        };
        Self::new(code, err.to_string())
    }
}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::MissingEnvVar(_) => ErrorCode::NotConfigured,
            _ => ErrorCode::InternalError,
        };
        Self::new(code, err.to_string())
    }
}
