//! AI mission drafts awaiting admin review.

use serde::{Deserialize, Serialize};

use pick_server::domain::catalog::ShowCategory;
use pick_server::domain::mission::{MissionForm, MissionKind};

use crate::domain::shared::{DomainError, DraftId, Timestamp, VideoId};
use crate::domain::video::{thumbnail_url, watch_url};

/// Author tag of drafts written by the model.
pub const AI_AUTHOR: &str = "AI_GEMINI";

/// Review state of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    /// Waiting for review.
    Pending,
    /// Accepted by an admin.
    Approved,
    /// Discarded by an admin.
    Rejected,
}

impl DraftStatus {
    /// Parse a status filter, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// The video a draft was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceVideo {
    /// Video id.
    pub video_id: VideoId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Channel name.
    pub channel_name: String,
    /// Channel id.
    pub channel_id: String,
    /// Watch page.
    pub url: String,
    /// Thumbnail.
    pub thumbnail_url: String,
}

impl SourceVideo {
    /// Source reference for a video, with derived watch and thumbnail URLs.
    #[must_use]
    pub fn new(
        video_id: VideoId,
        title: impl Into<String>,
        description: impl Into<String>,
        channel_name: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            url: watch_url(&video_id),
            thumbnail_url: thumbnail_url(&video_id),
            video_id,
            title: title.into(),
            description: description.into(),
            channel_name: channel_name.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// Mission content proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftContent {
    /// Question.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Resolution kind.
    pub kind: MissionKind,
    /// Answer shape.
    pub form: MissionForm,
    /// Options for binary and multi forms.
    pub options: Vec<String>,
}

/// A generated mission draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDraft {
    id: DraftId,
    title: String,
    description: String,
    kind: MissionKind,
    form: MissionForm,
    options: Vec<String>,
    category: ShowCategory,
    show_id: String,
    source_video: SourceVideo,
    status: DraftStatus,
    created_by: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl MissionDraft {
    /// A pending draft written by the model.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for a blank title.
    pub fn generated(
        content: DraftContent,
        show_id: &str,
        category: ShowCategory,
        source_video: SourceVideo,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        let title = content.title.trim();
        if title.is_empty() {
            return Err(DomainError::invalid("title", "Draft title is empty"));
        }
        Ok(Self {
            id: DraftId::generate(),
            title: title.to_string(),
            description: content.description.trim().to_string(),
            kind: content.kind,
            form: content.form,
            options: content
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            category,
            show_id: show_id.to_string(),
            source_video,
            status: DraftStatus::Pending,
            created_by: AI_AUTHOR.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Draft id.
    #[must_use]
    pub const fn id(&self) -> &DraftId {
        &self.id
    }

    /// Question.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Resolution kind.
    #[must_use]
    pub const fn kind(&self) -> MissionKind {
        self.kind
    }

    /// Answer shape.
    #[must_use]
    pub const fn form(&self) -> MissionForm {
        self.form
    }

    /// Options.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> ShowCategory {
        self.category
    }

    /// Show id.
    #[must_use]
    pub fn show_id(&self) -> &str {
        &self.show_id
    }

    /// Source video.
    #[must_use]
    pub const fn source_video(&self) -> &SourceVideo {
        &self.source_video
    }

    /// Review state.
    #[must_use]
    pub const fn status(&self) -> DraftStatus {
        self.status
    }

    /// Author tag.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last change.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Accept a pending draft.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the draft was already reviewed.
    pub fn approve(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.review(DraftStatus::Approved, now)
    }

    /// Discard a pending draft.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the draft was already reviewed.
    pub fn reject(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.review(DraftStatus::Rejected, now)
    }

    fn review(&mut self, status: DraftStatus, now: Timestamp) -> Result<(), DomainError> {
        if self.status != DraftStatus::Pending {
            return Err(DomainError::Conflict {
                entity_type: "MissionDraft".to_string(),
                message: format!("draft {} is already {}", self.id, self.status),
            });
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }

    /// Point the draft at another show.
    ///
    /// Returns `false` when show and category are already the given ones.
    pub fn reassign_show(&mut self, show_id: &str, category: ShowCategory, now: Timestamp) -> bool {
        if self.show_id == show_id && self.category == category {
            return false;
        }
        self.show_id = show_id.to_string();
        self.category = category;
        self.updated_at = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> DraftContent {
        DraftContent {
            title: "  옥순의 최종 선택은?  ".to_string(),
            description: "24기 최종회".to_string(),
            kind: MissionKind::Majority,
            form: MissionForm::Binary,
            options: vec!["영수".to_string(), " ".to_string(), "영호".to_string()],
        }
    }

    fn draft() -> MissionDraft {
        MissionDraft::generated(
            content(),
            "nasolo",
            ShowCategory::Love,
            SourceVideo::new(VideoId::new("v1"), "영상", "", "채널", "ch1"),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn generated_draft_is_pending_and_trimmed() {
        let draft = draft();
        assert_eq!(draft.status(), DraftStatus::Pending);
        assert_eq!(draft.title(), "옥순의 최종 선택은?");
        assert_eq!(draft.options(), ["영수", "영호"]);
        assert_eq!(draft.created_by(), AI_AUTHOR);
        assert_eq!(
            draft.source_video().url,
            "https://www.youtube.com/watch?v=v1"
        );
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut blank = content();
        blank.title = "  ".to_string();
        let result = MissionDraft::generated(
            blank,
            "nasolo",
            ShowCategory::Love,
            SourceVideo::new(VideoId::new("v1"), "", "", "", ""),
            Timestamp::now(),
        );
        assert!(matches!(result, Err(DomainError::InvalidValue { .. })));
    }

    #[test]
    fn review_happens_once() {
        let mut draft = draft();
        draft.approve(Timestamp::now()).unwrap();
        assert_eq!(draft.status(), DraftStatus::Approved);
        assert!(matches!(
            draft.reject(Timestamp::now()),
            Err(DomainError::Conflict { .. })
        ));
    }

    #[test]
    fn reassign_reports_changes() {
        let mut draft = draft();
        assert!(!draft.reassign_show("nasolo", ShowCategory::Love, Timestamp::now()));
        assert!(draft.reassign_show(
            "choegang-yagu-2025",
            ShowCategory::Victory,
            Timestamp::now()
        ));
        assert_eq!(draft.category(), ShowCategory::Victory);
    }

    #[test]
    fn status_filter_parsing() {
        assert_eq!(DraftStatus::parse("pending"), Some(DraftStatus::Pending));
        assert_eq!(DraftStatus::parse("Rejected"), Some(DraftStatus::Rejected));
        assert_eq!(DraftStatus::parse("done"), None);
    }
}
