//! Cafe sync commands and reports.

use serde::Serialize;

use crate::domain::cafe::{CafePost, CrawlProgress};
use crate::domain::shared::Timestamp;

/// Keywords searched when none are given.
pub const DEFAULT_CAFE_KEYWORDS: [&str; 7] = [
    "나는솔로",
    "나솔",
    "최강야구",
    "나솔사계",
    "돌싱글즈",
    "환승연애",
    "솔로지옥",
];

/// Posts collected when no limit is given.
pub const DEFAULT_CAFE_LIMIT: usize = 30;

/// Posts listed by the admin view.
pub const CAFE_LIST_LIMIT: usize = 50;

/// Cafe sync command. Missing fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CafeSyncCommand {
    /// Search keywords.
    pub keywords: Vec<String>,
    /// Posts to collect.
    pub limit: Option<usize>,
    /// Start of the date window.
    pub start: Option<Timestamp>,
    /// End of the date window.
    pub end: Option<Timestamp>,
}

/// Result of a cafe sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeSyncReport {
    /// Always `true` when the sync finished.
    pub success: bool,
    /// Progress record id.
    pub progress_id: String,
    /// Posts stored.
    pub saved: usize,
    /// Posts already stored.
    pub skipped: usize,
    /// Stored posts.
    pub posts: Vec<CafePost>,
}

/// Progress lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressResponse {
    /// Always `true`.
    pub success: bool,
    /// Progress record.
    pub progress: CrawlProgress,
}

/// Stored posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CafePostListResponse {
    /// Always `true`.
    pub success: bool,
    /// Posts, newest first.
    pub posts: Vec<CafePost>,
}
