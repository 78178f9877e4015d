//! Crawl and analysis commands and reports.

use serde::Serialize;

use pick_server::application::ports::AutoMissionSummary;

use crate::domain::draft::MissionDraft;
use crate::domain::video::Video;

/// Default videos kept per keyword.
pub const DEFAULT_MAX_RESULTS: u32 = 5;

/// Default crawl window in hours.
pub const DEFAULT_HOURS_BACK: i64 = 24;

/// Longest crawl window in hours (30 days).
pub const MAX_HOURS_BACK: i64 = 720;

/// Crawl command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlCommand {
    /// Search keywords.
    pub keywords: Vec<String>,
    /// Videos kept per keyword.
    pub max_results: u32,
    /// Upload window in hours.
    pub hours_back: i64,
}

impl CrawlCommand {
    /// Crawl `keywords` with the default limits.
    #[must_use]
    pub fn with_defaults(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            max_results: DEFAULT_MAX_RESULTS,
            hours_back: DEFAULT_HOURS_BACK,
        }
    }
}

/// Result of a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Always `true` when the crawl ran.
    pub success: bool,
    /// Newly stored videos.
    pub videos: Vec<Video>,
    /// Relevant videos found before de-duplication.
    pub total_found: usize,
    /// Videos already stored.
    pub skipped_existing: usize,
    /// Expired videos purged first.
    pub expired_deleted: usize,
    /// Summary line.
    pub message: String,
}

/// Video handed to screening and drafting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeCommand {
    /// Video id.
    pub video_id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Channel name.
    pub channel_name: String,
    /// Channel id.
    pub channel_id: String,
    /// Keyword the video was found with.
    pub keyword: Option<String>,
}

/// Result of analyzing one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReport {
    /// `true` when at least one draft was stored.
    pub success: bool,
    /// Stored drafts.
    pub missions: Vec<MissionDraft>,
    /// Whether anything was stored.
    pub saved_to_db: bool,
    /// Drafts stored.
    pub saved_count: usize,
}

/// Result of the daily run, in the shape the pick server reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRunReport {
    /// Always `true` when the run finished.
    pub success: bool,
    /// Totals.
    #[serde(flatten)]
    pub summary: AutoMissionSummary,
}
