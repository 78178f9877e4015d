//! Crawled videos and the channels that posted them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::shared::{ChannelId, Timestamp, VideoId};

/// Days a crawled video is kept before it expires.
pub const VIDEO_TTL_DAYS: i64 = 30;

/// Watch page of a video.
#[must_use]
pub fn watch_url(video_id: &VideoId) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// High-quality thumbnail of a video.
#[must_use]
pub fn thumbnail_url(video_id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}

/// Video metadata as returned by a YouTube search, enriched with statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnapshot {
    /// Video id.
    pub video_id: VideoId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Uploading channel.
    pub channel_id: ChannelId,
    /// Channel display name.
    pub channel_name: String,
    /// Channel subscribers.
    pub subscriber_count: u64,
    /// Views.
    pub view_count: u64,
    /// Likes.
    pub like_count: u64,
    /// Comments.
    pub comment_count: u64,
    /// ISO 8601 duration (`PT12M3S`).
    pub duration: Option<String>,
    /// Upload time.
    pub published_at: Option<Timestamp>,
    /// Thumbnail URL from the search result.
    pub thumbnail: Option<String>,
}

/// A stored video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Crawled metadata.
    #[serde(flatten)]
    pub snapshot: VideoSnapshot,
    /// Watch page.
    pub video_url: String,
    /// Search keyword that found it.
    pub keyword: String,
    /// When it was stored.
    pub collected_at: Timestamp,
    /// When it is dropped.
    pub expires_at: Timestamp,
}

impl Video {
    /// Store a search hit found with `keyword` at `now`.
    #[must_use]
    pub fn collect(snapshot: VideoSnapshot, keyword: &str, now: Timestamp) -> Self {
        Self {
            video_url: watch_url(&snapshot.video_id),
            snapshot,
            keyword: keyword.to_string(),
            collected_at: now,
            expires_at: now.plus(chrono::Duration::days(VIDEO_TTL_DAYS)),
        }
    }

    /// Video id.
    #[must_use]
    pub const fn id(&self) -> &VideoId {
        &self.snapshot.video_id
    }

    /// Whether the video should be purged at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Channel tracking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelStatus {
    /// Crawled regularly.
    Active,
}

/// A channel that posted crawled videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Channel id.
    pub channel_id: ChannelId,
    /// Display name.
    pub channel_name: String,
    /// Subscribers at the last crawl.
    pub subscriber_count: u64,
    /// Search keywords it appeared under.
    pub keywords: BTreeSet<String>,
    /// Source platform.
    pub platform: String,
    /// Tracking status.
    pub status: ChannelStatus,
    /// Videos found in the crawl that discovered it.
    pub video_count: u64,
    /// Last crawl that saw it.
    pub last_crawled_at: Timestamp,
}

impl Channel {
    /// A channel seen for the first time.
    #[must_use]
    pub fn discovered(video: &VideoSnapshot, keyword: &str, now: Timestamp) -> Self {
        Self {
            channel_id: video.channel_id.clone(),
            channel_name: video.channel_name.clone(),
            subscriber_count: video.subscriber_count,
            keywords: BTreeSet::from([keyword.to_string()]),
            platform: "youtube".to_string(),
            status: ChannelStatus::Active,
            video_count: 1,
            last_crawled_at: now,
        }
    }

    /// Fold a later crawl into a stored channel.
    ///
    /// Keywords accumulate; the subscriber count and crawl time are refreshed.
    pub fn merge(&mut self, newer: &Self) {
        self.keywords.extend(newer.keywords.iter().cloned());
        self.subscriber_count = newer.subscriber_count;
        self.last_crawled_at = newer.last_crawled_at;
    }
}
