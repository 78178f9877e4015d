//! Progress of a running cafe crawl.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{ProgressId, Timestamp};

/// Crawl state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    /// Still working.
    Running,
    /// Finished.
    Completed,
    /// Aborted with an error.
    Failed,
}

/// Progress record polled by the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlProgress {
    /// Record id.
    pub id: ProgressId,
    /// State.
    pub status: CrawlStatus,
    /// Posts handled so far.
    pub current: usize,
    /// Posts expected.
    pub total: usize,
    /// Human-readable status line.
    pub message: String,
    /// Start time.
    pub started_at: Timestamp,
    /// End time, once finished or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl CrawlProgress {
    /// A running crawl started at `now`.
    #[must_use]
    pub fn start(now: Timestamp) -> Self {
        Self {
            id: ProgressId::for_start(now),
            status: CrawlStatus::Running,
            current: 0,
            total: 0,
            message: "네이버 카페 크롤링 시작...".to_string(),
            started_at: now,
            completed_at: None,
        }
    }

    /// Record intermediate counts.
    pub fn advance(&mut self, current: usize, total: usize, message: impl Into<String>) {
        self.current = current;
        self.total = total;
        self.message = message.into();
    }

    /// Mark the crawl finished.
    pub fn complete(&mut self, saved: usize, skipped: usize, now: Timestamp) {
        self.status = CrawlStatus::Completed;
        self.current = saved;
        self.total = saved;
        self.message = format!("완료! {saved}개 게시글 저장됨 ({skipped}개 중복 스킵)");
        self.completed_at = Some(now);
    }

    /// Mark the crawl failed.
    pub fn fail(&mut self, message: impl Into<String>, now: Timestamp) {
        self.status = CrawlStatus::Failed;
        self.message = message.into();
        self.completed_at = Some(now);
    }
}
