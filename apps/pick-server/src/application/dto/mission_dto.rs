//! Mission DTOs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::catalog::ShowCategory;
use crate::domain::mission::{
    EpisodeStatus, MatchCandidates, MatchPair, Mission, MissionForm, MissionKind, MissionStats,
    MissionStatus, RevealPolicy, SeasonType,
};
use crate::domain::tally::MatchTally;
use crate::domain::shared::Timestamp;

/// Mission as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct MissionDto {
    /// Mission ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind.
    pub kind: MissionKind,
    /// Form.
    pub form: MissionForm,
    /// Reveal policy.
    pub reveal_policy: RevealPolicy,
    /// Status as of the request.
    pub status: MissionStatus,
    /// Category.
    pub category: ShowCategory,
    /// Show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
    /// Season coverage.
    pub season_type: SeasonType,
    /// Season number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    /// Creator.
    pub creator_id: String,
    /// Options.
    pub options: Vec<String>,
    /// Match participants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_candidates: Option<MatchCandidates>,
    /// Deadline.
    pub deadline: Timestamp,
    /// Episodes (match missions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    /// Episode statuses (match missions).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub episode_statuses: BTreeMap<u32, EpisodeStatus>,
    /// Korean broadcast weekday.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_day: Option<&'static str>,
    /// Broadcast time `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_time: Option<String>,
    /// Correct answer once settled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Final couples once settled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub final_answer: Vec<MatchPair>,
    /// Counters.
    pub stats: MissionStats,
    /// Creation time.
    pub created_at: Timestamp,
}

impl MissionDto {
    /// Build the DTO as seen at `now`.
    #[must_use]
    pub fn from_mission(mission: &Mission, now: Timestamp) -> Self {
        let settled = mission.status() == MissionStatus::Settled;
        Self {
            id: mission.id().to_string(),
            title: mission.title().to_string(),
            description: mission.description().map(str::to_string),
            kind: mission.kind(),
            form: mission.form(),
            reveal_policy: mission.reveal_policy(),
            status: mission.effective_status(now),
            category: mission.category(),
            show_id: mission.show_id().map(str::to_string),
            season_type: mission.season_type(),
            season_number: mission.season_number(),
            creator_id: mission.creator_id().to_string(),
            options: mission.options().to_vec(),
            match_candidates: mission.match_candidates().cloned(),
            deadline: mission.deadline(),
            total_episodes: mission.form().is_match().then(|| mission.total_episodes()),
            episode_statuses: mission.episode_statuses().clone(),
            broadcast_day: mission.broadcast().map(|b| b.day_label()),
            broadcast_time: mission.broadcast().map(|b| b.time_label()),
            correct_answer: settled
                .then(|| mission.correct_answer().map(str::to_string))
                .flatten(),
            final_answer: if settled {
                mission.final_answer().to_vec()
            } else {
                Vec::new()
            },
            stats: mission.stats(),
            created_at: mission.created_at(),
        }
    }
}

/// Per-option result line.
#[derive(Debug, Clone, Serialize)]
pub struct OptionResultDto {
    /// Option label.
    pub option: String,
    /// Votes.
    pub count: u64,
    /// Rounded share of all votes.
    pub percentage: u32,
}

/// Results of a binary, multi or subjective mission.
#[derive(Debug, Clone, Serialize)]
pub struct MissionResultsDto {
    /// Mission ID.
    pub mission_id: String,
    /// Status as of the request.
    pub status: MissionStatus,
    /// Whether per-option numbers are included.
    pub revealed: bool,
    /// Picks counted.
    pub total_votes: u64,
    /// Distinct voters.
    pub participants: u64,
    /// Per-option results; empty while hidden.
    pub options: Vec<OptionResultDto>,
    /// Leading option; hidden while results are hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub majority_option: Option<String>,
    /// Correct answer once settled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Results of a match mission.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResultsDto {
    /// Mission ID.
    pub mission_id: String,
    /// Status as of the request.
    pub status: MissionStatus,
    /// Couple counts and participation.
    #[serde(flatten)]
    pub tally: MatchTally,
    /// Episode statuses.
    pub episode_statuses: BTreeMap<u32, EpisodeStatus>,
    /// Final couples once settled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub final_answer: Vec<MatchPair>,
}

/// Outcome of a pick submission.
#[derive(Debug, Clone, Serialize)]
pub struct PickReceiptDto {
    /// Mission ID.
    pub mission_id: String,
    /// Voter.
    pub user_id: String,
    /// Whether this was the user's first pick.
    pub first_pick: bool,
    /// Distinct voters after the pick.
    pub participants: u64,
    /// Picks counted after the pick.
    pub total_votes: u64,
}

/// Outcome of a settlement.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementDto {
    /// Mission ID.
    pub mission_id: String,
    /// Status after the call.
    pub status: MissionStatus,
    /// Ledger entries written.
    pub point_logs_written: usize,
}
