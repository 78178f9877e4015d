//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

use crate::application::use_cases::PreferencesUpdate;
use crate::domain::catalog::{ShowCategory, normalize_category};
use crate::domain::mission::{
    BroadcastSchedule, CreateMissionCommand, EpisodeStatus, MatchCandidates, MatchPair,
    MissionFilter, MissionForm, MissionKind, MissionStatus, RevealPolicy, SeasonType,
};
use crate::domain::shared::{Timestamp, UserId};
use crate::domain::tally::EpisodeFilter;
use crate::domain::user::CreateUserCommand;
use crate::error::ServiceError;

/// Request to create a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMissionRequest {
    /// Question shown to viewers.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Resolution kind.
    pub kind: MissionKind,
    /// Answer shape.
    pub form: MissionForm,
    /// Result visibility.
    #[serde(default)]
    pub reveal_policy: RevealPolicy,
    /// Category id or Korean label.
    pub category: String,
    /// Show.
    #[serde(default)]
    pub show_id: Option<String>,
    /// Season coverage.
    #[serde(default)]
    pub season_type: SeasonType,
    /// Season number.
    #[serde(default)]
    pub season_number: Option<u32>,
    /// Author.
    pub creator_id: String,
    /// Options (binary and multi).
    #[serde(default)]
    pub options: Vec<String>,
    /// Participants (match).
    #[serde(default)]
    pub match_candidates: Option<MatchCandidates>,
    /// When picking closes.
    pub deadline: Timestamp,
    /// Episode count (match).
    #[serde(default)]
    pub total_episodes: Option<u32>,
    /// Korean weekday label of the broadcast (match).
    #[serde(default)]
    pub broadcast_day: Option<String>,
    /// `HH:MM` broadcast start in KST (match).
    #[serde(default)]
    pub broadcast_time: Option<String>,
}

impl CreateMissionRequest {
    /// Convert into a domain command.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REQUEST` for an unknown category or a half-specified broadcast slot.
    pub fn into_command(self) -> Result<CreateMissionCommand, ServiceError> {
        let category = parse_category(&self.category)?;
        let broadcast = match (self.broadcast_day.as_deref(), self.broadcast_time.as_deref()) {
            (Some(day), Some(time)) => Some(BroadcastSchedule::parse(day, time)?),
            (None, None) => None,
            _ => {
                return Err(ServiceError::invalid(
                    "broadcast_day and broadcast_time must be given together",
                ));
            }
        };

        Ok(CreateMissionCommand {
            title: self.title,
            description: self.description,
            kind: self.kind,
            form: self.form,
            reveal_policy: self.reveal_policy,
            category,
            show_id: self.show_id,
            season_type: self.season_type,
            season_number: self.season_number,
            creator_id: UserId::new(self.creator_id),
            options: self.options,
            match_candidates: self.match_candidates,
            deadline: self.deadline,
            total_episodes: self.total_episodes,
            broadcast,
        })
    }
}

/// Query of `GET /api/v1/missions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMissionsQuery {
    /// Stored status.
    #[serde(default)]
    pub status: Option<MissionStatus>,
    /// Form.
    #[serde(default)]
    pub form: Option<MissionForm>,
    /// Show.
    #[serde(default)]
    pub show_id: Option<String>,
}

impl From<ListMissionsQuery> for MissionFilter {
    fn from(query: ListMissionsQuery) -> Self {
        Self {
            status: query.status,
            form: query.form,
            show_id: query.show_id,
            ..Self::default()
        }
    }
}

/// Request to pick an option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPickRequest {
    /// Voter.
    pub user_id: String,
    /// Chosen option, or free text for subjective missions.
    pub selected_option: String,
}

/// Request to predict couples for one episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitMatchPickRequest {
    /// Voter.
    pub user_id: String,
    /// Episode the prediction is for.
    pub episode_no: u32,
    /// Predicted couples.
    pub pairs: Vec<MatchPair>,
}

/// Query of the match results endpoint.
///
/// `episodes=1,2,3` selects several episodes, `episode=2` one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResultsQuery {
    /// Single episode.
    #[serde(default)]
    pub episode: Option<u32>,
    /// Comma-separated episodes.
    #[serde(default)]
    pub episodes: Option<String>,
}

impl MatchResultsQuery {
    /// Episode filter described by the query.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REQUEST` when `episodes` holds something other than numbers.
    pub fn filter(&self) -> Result<EpisodeFilter, ServiceError> {
        if let Some(raw) = self.episodes.as_deref().filter(|s| !s.trim().is_empty()) {
            let episodes = raw
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<u32>()
                        .map_err(|_| ServiceError::invalid(format!("Invalid episode: {part}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(EpisodeFilter::Many(episodes));
        }
        Ok(self.episode.map_or(EpisodeFilter::All, EpisodeFilter::Single))
    }
}

/// Request to submit or correct the answer of a predict mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// Caller; must be the creator.
    pub user_id: String,
    /// Correct option.
    pub answer: String,
}

/// Request to settle a match mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAnswerRequest {
    /// Caller; must be the creator.
    pub user_id: String,
    /// Final couples.
    pub final_answer: Vec<MatchPair>,
}

/// Request to change an episode status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeStatusRequest {
    /// New status.
    pub status: EpisodeStatus,
}

/// Optional `limit` query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    /// Maximum entries.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Request to register a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Externally assigned ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    pub nickname: String,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<CreateUserRequest> for CreateUserCommand {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            id: req.id.map(UserId::new),
            email: req.email,
            nickname: req.nickname,
            avatar_url: req.avatar_url,
        }
    }
}

/// Request to edit a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// New avatar.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Request carrying text from a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    /// Author.
    pub user_id: String,
    /// Text.
    pub content: String,
}

/// Request or query naming the acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRequest {
    /// Acting user.
    pub user_id: String,
}

/// Optional viewer of a comment thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerQuery {
    /// Viewer whose likes are flagged.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Request to change notification preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesRequest {
    /// New-mission and digest emails.
    #[serde(default)]
    pub email_enabled: Option<bool>,
    /// Deadline emails.
    #[serde(default)]
    pub deadline_email_enabled: Option<bool>,
    /// Followed categories, ids or Korean labels.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl TryFrom<PreferencesRequest> for PreferencesUpdate {
    type Error = ServiceError;

    fn try_from(req: PreferencesRequest) -> Result<Self, Self::Error> {
        let categories = req
            .categories
            .map(|raw| raw.iter().map(|c| parse_category(c)).collect())
            .transpose()?;
        Ok(Self {
            email_enabled: req.email_enabled,
            deadline_email_enabled: req.deadline_email_enabled,
            categories,
        })
    }
}

/// Query of the daily digest cron.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestQuery {
    /// `noon` or `evening`; inferred from the clock when absent.
    #[serde(default)]
    pub slot: Option<String>,
}

fn parse_category(raw: &str) -> Result<ShowCategory, ServiceError> {
    normalize_category(raw).ok_or_else(|| ServiceError::invalid(format!("Unknown category: {raw}")))
}
