//! Video and channel repository traits.

use std::collections::HashSet;

use async_trait::async_trait;

use super::{Channel, Video};
use crate::domain::shared::{ChannelId, DomainError, Timestamp, VideoId};

/// Storage of crawled videos.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Delete videos whose `expires_at` is at or before `now`; returns how many.
    async fn delete_expired(&self, now: Timestamp) -> Result<usize, DomainError>;

    /// Which of `ids` are already stored.
    async fn existing_ids(&self, ids: &[VideoId]) -> Result<HashSet<VideoId>, DomainError>;

    /// Insert or replace videos.
    async fn save_all(&self, videos: &[Video]) -> Result<(), DomainError>;

    /// Find one video.
    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, DomainError>;
}

/// Storage of discovered channels.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find a channel.
    async fn find_by_id(&self, id: &ChannelId) -> Result<Option<Channel>, DomainError>;

    /// Insert or replace a channel.
    async fn save(&self, channel: &Channel) -> Result<(), DomainError>;
}
