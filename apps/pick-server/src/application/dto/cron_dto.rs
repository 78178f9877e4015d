//! Cron job reports.

use serde::Serialize;

use super::DigestSlot;
use crate::application::ports::AutoMissionSummary;

/// Episode opened by the broadcast schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedEpisode {
    /// Mission ID.
    pub mission_id: String,
    /// Episode that opened.
    pub episode_no: u32,
}

/// Result of `match-episode-open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeOpenReport {
    /// Always `true` when the job ran.
    pub success: bool,
    /// Match missions inspected.
    pub checked: usize,
    /// Episodes opened.
    pub opened: Vec<OpenedEpisode>,
}

/// Result of `daily-mission-notification`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestRunReport {
    /// Always `true` when the job ran.
    pub success: bool,
    /// Window that was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<DigestSlot>,
    /// Missions in the window.
    pub mission_count: usize,
    /// In-app notifications created.
    pub in_app_sent: usize,
    /// Emails delivered.
    pub email_sent: usize,
    /// Why nothing was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of `daily-auto-mission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoMissionReport {
    /// Always `true` when the bot answered.
    pub success: bool,
    /// Keywords sent to the bot.
    pub keywords: Vec<String>,
    /// Totals reported by the bot.
    #[serde(flatten)]
    pub summary: AutoMissionSummary,
}

/// Result of `deadline-sweep`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineSweepReport {
    /// Always `true` when the job ran.
    pub success: bool,
    /// Missions closed.
    pub closed: usize,
    /// Majority missions settled.
    pub settled: usize,
    /// Missions whose participants were notified.
    pub notified: usize,
    /// Old read notifications deleted.
    pub pruned: usize,
}
