//! Draft review reports.

use serde::Serialize;

use pick_server::domain::catalog::ShowCategory;

use crate::domain::draft::MissionDraft;

/// Drafts listed for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftListResponse {
    /// Always `true`.
    pub success: bool,
    /// Drafts, newest first.
    pub missions: Vec<MissionDraft>,
}

/// Draft after a review action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReviewResponse {
    /// Always `true`.
    pub success: bool,
    /// Updated draft.
    pub mission: MissionDraft,
}

/// Details kept in a show-id repair report.
pub const MAX_FIX_DETAILS: usize = 100;

/// One repaired draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowIdChange {
    /// Draft id.
    pub id: String,
    /// Show before.
    pub old_show_id: String,
    /// Show after.
    pub new_show_id: String,
    /// Category before.
    pub old_category: ShowCategory,
    /// Category after.
    pub new_category: ShowCategory,
    /// Draft title.
    pub title: String,
}

/// Result of a show-id repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixShowIdsReport {
    /// Always `true` when the repair ran.
    pub success: bool,
    /// Summary line.
    pub message: String,
    /// Drafts changed.
    pub updated: usize,
    /// Drafts left as they were.
    pub skipped: usize,
    /// First changes.
    pub details: Vec<ShowIdChange>,
}
