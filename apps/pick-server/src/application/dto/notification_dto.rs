//! Mission notification dispatch DTOs.

use serde::{Deserialize, Serialize};

/// Which notification to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchKind {
    /// A mission was published.
    #[default]
    New,
    /// A mission closed.
    Deadline,
    /// Digest of several new missions.
    Batch,
}

/// Time-of-day window of a daily digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestSlot {
    /// Missions created 00:00 to 12:00 KST.
    Noon,
    /// Missions created 12:00 to 19:00 KST.
    Evening,
}

impl DigestSlot {
    /// Korean label used in digest texts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Noon => "점심",
            Self::Evening => "저녁",
        }
    }

    /// Parse a query value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "noon" => Some(Self::Noon),
            "evening" => Some(Self::Evening),
            _ => None,
        }
    }
}

/// Mission listed in a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestMission {
    /// Mission ID.
    #[serde(alias = "missionId")]
    pub id: String,
    /// Title.
    #[serde(alias = "missionTitle")]
    pub title: String,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Show.
    #[serde(default)]
    pub show_id: Option<String>,
}

/// Body of `POST /api/send-mission-notification`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionNotificationRequest {
    /// Mission ID (new/deadline).
    #[serde(default)]
    pub mission_id: Option<String>,
    /// Mission title (new/deadline).
    #[serde(default)]
    pub mission_title: Option<String>,
    /// Category id or name.
    #[serde(default)]
    pub category: Option<String>,
    /// Show.
    #[serde(default)]
    pub show_id: Option<String>,
    /// Mission author.
    #[serde(default)]
    pub creator_id: Option<String>,
    /// Dispatch kind.
    #[serde(default, rename = "type")]
    pub kind: DispatchKind,
    /// Digest slot (batch).
    #[serde(default)]
    pub slot: Option<DigestSlot>,
    /// Missions of the digest (batch).
    #[serde(default)]
    pub missions: Vec<DigestMission>,
}

/// Per-recipient delivery outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    /// Whether delivery succeeded.
    pub success: bool,
    /// Recipient.
    pub email: String,
    /// Provider message ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Dispatch summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    /// Always `true` when the dispatch itself ran.
    pub success: bool,
    /// Emails delivered.
    pub sent: usize,
    /// Emails attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    /// Emails that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    /// In-app notifications created.
    pub notified: usize,
    /// Per-recipient outcomes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<DeliveryResult>,
    /// Informational message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DispatchReport {
    /// Report for a dispatch that found nobody to notify.
    #[must_use]
    pub fn nobody() -> Self {
        Self {
            success: true,
            message: Some("No users to notify".to_string()),
            ..Self::default()
        }
    }
}
