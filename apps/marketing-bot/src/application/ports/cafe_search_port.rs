//! Cafe Search Port (Driven Port)

use async_trait::async_trait;

use crate::domain::cafe::CafeArticle;

/// Naver open API error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NaverError {
    /// Client id or secret is missing.
    #[error("Naver API credentials are not configured")]
    NotConfigured,

    /// The API answered with a non-success status.
    #[error("Naver API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failed.
    #[error("Naver request failed: {message}")]
    Transport { message: String },

    /// The response body did not match the expected shape.
    #[error("Naver response could not be decoded: {message}")]
    Decode { message: String },
}

/// Port for cafe article search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CafeSearchPort: Send + Sync {
    /// Articles for `keyword`, newest first, starting at the 1-based `start`.
    async fn search(
        &self,
        keyword: &str,
        start: u32,
        display: u32,
    ) -> Result<Vec<CafeArticle>, NaverError>;
}
