//! YouTube Port (Driven Port)
//!
//! Keyword search over recent uploads, enriched with statistics.

use async_trait::async_trait;

use crate::domain::shared::Timestamp;
use crate::domain::video::VideoSnapshot;

/// YouTube Data API error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum YouTubeError {
    /// The API key is missing.
    #[error("YouTube API key is not configured")]
    NotConfigured,

    /// The API answered with a non-success status.
    #[error("YouTube API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failed.
    #[error("YouTube request failed: {message}")]
    Transport { message: String },

    /// The response body did not match the expected shape.
    #[error("YouTube response could not be decoded: {message}")]
    Decode { message: String },
}

/// Port for video search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait YouTubePort: Send + Sync {
    /// Videos for `keyword` uploaded after `published_after`, newest first.
    async fn search_videos(
        &self,
        keyword: &str,
        published_after: Timestamp,
        max_results: u32,
    ) -> Result<Vec<VideoSnapshot>, YouTubeError>;
}
