//! Mission Aggregate Root
//!
//! A mission is a question about a show that viewers pick an answer to.
//! The aggregate owns the lifecycle `open → closed → settled`, the answer
//! used for scoring and, for match missions, the per-episode statuses.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::errors::MissionError;
use super::events::{EpisodeStatusChanged, MissionCreated, MissionEvent, MissionSettled};
use super::value_objects::{
    BroadcastSchedule, EpisodeStatus, MatchCandidates, MatchPair, MissionForm, MissionKind,
    MissionStats, MissionStatus, RevealPolicy, SeasonType,
};
use crate::domain::catalog::ShowCategory;
use crate::domain::shared::{MissionId, Timestamp, UserId};
use crate::domain::tally::OptionTally;

/// Episodes a match mission runs for when the creator does not say.
pub const DEFAULT_TOTAL_EPISODES: u32 = 8;

/// Command to create a new mission.
#[derive(Debug, Clone)]
pub struct CreateMissionCommand {
    /// Question shown to viewers.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Resolution kind.
    pub kind: MissionKind,
    /// Answer shape.
    pub form: MissionForm,
    /// Result visibility.
    pub reveal_policy: RevealPolicy,
    /// Show category.
    pub category: ShowCategory,
    /// Show the mission is about.
    pub show_id: Option<String>,
    /// Season coverage.
    pub season_type: SeasonType,
    /// Season number for per-season missions.
    pub season_number: Option<u32>,
    /// Author.
    pub creator_id: UserId,
    /// Options for binary/multi missions.
    pub options: Vec<String>,
    /// Participants for match missions.
    pub match_candidates: Option<MatchCandidates>,
    /// When picking closes.
    pub deadline: Timestamp,
    /// Episode count for match missions.
    pub total_episodes: Option<u32>,
    /// Weekly broadcast slot for match missions.
    pub broadcast: Option<BroadcastSchedule>,
}

impl CreateMissionCommand {
    /// Validate the command parameters against the current time.
    ///
    /// # Errors
    ///
    /// Returns error if required parameters are missing or invalid.
    pub fn validate(&self, now: Timestamp) -> Result<(), MissionError> {
        if self.title.trim().is_empty() {
            return Err(invalid("title", "Title must not be blank"));
        }

        if self.deadline <= now {
            return Err(invalid("deadline", "Deadline must be in the future"));
        }

        match (self.season_type, self.season_number) {
            (SeasonType::PerSeason, None) => {
                return Err(invalid("season_number", "Per-season missions need a season number"));
            }
            (SeasonType::All, Some(_)) => {
                return Err(invalid("season_number", "Season number requires per-season type"));
            }
            _ => {}
        }

        if let Some(show_id) = &self.show_id {
            if crate::domain::catalog::show_by_id(show_id).is_none() {
                return Err(invalid("show_id", format!("Unknown show: {show_id}")));
            }
        }

        let options = self.trimmed_options();
        let mut distinct = options.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != options.len() {
            return Err(invalid("options", "Options must be distinct"));
        }

        match self.form {
            MissionForm::Binary if options.len() != 2 => {
                return Err(invalid("options", "Binary missions need exactly 2 options"));
            }
            MissionForm::Multi if !(3..=5).contains(&options.len()) => {
                return Err(invalid("options", "Multi missions need 3 to 5 options"));
            }
            MissionForm::Match => {
                let candidates = self.match_candidates.as_ref().ok_or_else(|| {
                    invalid("match_candidates", "Match missions need participants")
                })?;
                if candidates.left.iter().all(|c| c.trim().is_empty())
                    || candidates.right.iter().all(|c| c.trim().is_empty())
                {
                    return Err(invalid(
                        "match_candidates",
                        "Both columns need at least one participant",
                    ));
                }
                if self.total_episodes == Some(0) {
                    return Err(invalid("total_episodes", "Must be at least 1"));
                }
            }
            _ => {}
        }

        if self.kind == MissionKind::Majority
            && matches!(self.form, MissionForm::Match | MissionForm::Subjective)
        {
            return Err(invalid(
                "kind",
                "Majority missions need a fixed option list",
            ));
        }

        if self.broadcast.is_some() && !self.form.is_match() {
            return Err(invalid("broadcast", "Only match missions have a broadcast slot"));
        }

        Ok(())
    }

    fn trimmed_options(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

fn invalid(field: &str, message: impl Into<String>) -> MissionError {
    MissionError::InvalidParameters {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Parameters for reconstituting a Mission from storage.
///
/// No domain events are generated during reconstitution.
#[derive(Debug, Clone)]
pub struct ReconstitutedMissionParams {
    /// Mission identifier.
    pub id: MissionId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Kind.
    pub kind: MissionKind,
    /// Form.
    pub form: MissionForm,
    /// Reveal policy.
    pub reveal_policy: RevealPolicy,
    /// Status.
    pub status: MissionStatus,
    /// Category.
    pub category: ShowCategory,
    /// Show.
    pub show_id: Option<String>,
    /// Season type.
    pub season_type: SeasonType,
    /// Season number.
    pub season_number: Option<u32>,
    /// Creator.
    pub creator_id: UserId,
    /// Options.
    pub options: Vec<String>,
    /// Match participants.
    pub match_candidates: Option<MatchCandidates>,
    /// Deadline.
    pub deadline: Timestamp,
    /// Episodes.
    pub total_episodes: u32,
    /// Episode statuses.
    pub episode_statuses: BTreeMap<u32, EpisodeStatus>,
    /// Broadcast slot.
    pub broadcast: Option<BroadcastSchedule>,
    /// Correct answer for predict missions.
    pub correct_answer: Option<String>,
    /// Tallied majority option.
    pub majority_option: Option<String>,
    /// Final couples for match missions.
    pub final_answer: Vec<MatchPair>,
    /// Percentages per option.
    pub option_vote_counts: BTreeMap<String, u32>,
    /// Counters.
    pub stats: MissionStats,
    /// Whether points were paid out.
    pub points_distributed: bool,
    /// Whether the deadline notification went out.
    pub deadline_notified: bool,
    /// KST date an episode was last opened by the broadcast schedule.
    pub last_auto_opened_on: Option<NaiveDate>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Storage version.
    pub version: u64,
}

/// Mission Aggregate Root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    id: MissionId,
    title: String,
    description: Option<String>,
    kind: MissionKind,
    form: MissionForm,
    reveal_policy: RevealPolicy,
    status: MissionStatus,
    category: ShowCategory,
    show_id: Option<String>,
    season_type: SeasonType,
    season_number: Option<u32>,
    creator_id: UserId,
    options: Vec<String>,
    match_candidates: Option<MatchCandidates>,
    deadline: Timestamp,
    total_episodes: u32,
    episode_statuses: BTreeMap<u32, EpisodeStatus>,
    #[serde(skip)]
    broadcast: Option<BroadcastSchedule>,
    correct_answer: Option<String>,
    majority_option: Option<String>,
    final_answer: Vec<MatchPair>,
    option_vote_counts: BTreeMap<String, u32>,
    stats: MissionStats,
    points_distributed: bool,
    deadline_notified: bool,
    last_auto_opened_on: Option<NaiveDate>,
    #[serde(skip)]
    events: Vec<MissionEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(default)]
    version: u64,
}

impl Mission {
    /// Create a new mission from a command.
    ///
    /// Generates a `MissionCreated` event.
    ///
    /// # Errors
    ///
    /// Returns error if command validation fails.
    pub fn new(cmd: CreateMissionCommand) -> Result<Self, MissionError> {
        Self::create(cmd, Timestamp::now())
    }

    /// Create a new mission as of `now`.
    ///
    /// # Errors
    ///
    /// Returns error if command validation fails.
    pub fn create(cmd: CreateMissionCommand, now: Timestamp) -> Result<Self, MissionError> {
        cmd.validate(now)?;

        let options = cmd.trimmed_options();
        let is_match = cmd.form.is_match();
        let id = MissionId::generate();

        let mut mission = Self {
            id: id.clone(),
            title: cmd.title.trim().to_string(),
            description: cmd
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            kind: cmd.kind,
            form: cmd.form,
            reveal_policy: cmd.reveal_policy,
            status: MissionStatus::Open,
            category: cmd.category,
            show_id: cmd.show_id,
            season_type: cmd.season_type,
            season_number: cmd.season_number,
            creator_id: cmd.creator_id.clone(),
            option_vote_counts: options.iter().map(|o| (o.clone(), 0)).collect(),
            options,
            match_candidates: cmd.match_candidates.map(|c| MatchCandidates {
                left: c.left.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
                right: c.right.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
            }),
            deadline: cmd.deadline,
            total_episodes: if is_match {
                cmd.total_episodes.unwrap_or(DEFAULT_TOTAL_EPISODES)
            } else {
                0
            },
            episode_statuses: BTreeMap::new(),
            broadcast: cmd.broadcast,
            correct_answer: None,
            majority_option: None,
            final_answer: Vec::new(),
            stats: MissionStats::default(),
            points_distributed: false,
            deadline_notified: false,
            last_auto_opened_on: None,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        };

        if is_match && mission.broadcast.is_none() {
            // Without a broadcast slot nothing opens episodes automatically.
            mission.episode_statuses.insert(1, EpisodeStatus::Open);
        }

        mission.events.push(MissionEvent::Created(MissionCreated {
            mission_id: id,
            creator_id: cmd.creator_id,
            kind: mission.kind,
            form: mission.form,
            occurred_at: now,
        }));

        Ok(mission)
    }

    /// Reconstitute a mission from storage.
    #[must_use]
    pub fn reconstitute(params: ReconstitutedMissionParams) -> Self {
        Self {
            id: params.id,
            title: params.title,
            description: params.description,
            kind: params.kind,
            form: params.form,
            reveal_policy: params.reveal_policy,
            status: params.status,
            category: params.category,
            show_id: params.show_id,
            season_type: params.season_type,
            season_number: params.season_number,
            creator_id: params.creator_id,
            options: params.options,
            match_candidates: params.match_candidates,
            deadline: params.deadline,
            total_episodes: params.total_episodes,
            episode_statuses: params.episode_statuses,
            broadcast: params.broadcast,
            correct_answer: params.correct_answer,
            majority_option: params.majority_option,
            final_answer: params.final_answer,
            option_vote_counts: params.option_vote_counts,
            stats: params.stats,
            points_distributed: params.points_distributed,
            deadline_notified: params.deadline_notified,
            last_auto_opened_on: params.last_auto_opened_on,
            events: Vec::new(),
            created_at: params.created_at,
            updated_at: params.updated_at,
            version: params.version,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Mission ID.
    #[must_use]
    pub const fn id(&self) -> &MissionId {
        &self.id
    }

    /// Title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Kind.
    #[must_use]
    pub const fn kind(&self) -> MissionKind {
        self.kind
    }

    /// Form.
    #[must_use]
    pub const fn form(&self) -> MissionForm {
        self.form
    }

    /// Reveal policy.
    #[must_use]
    pub const fn reveal_policy(&self) -> RevealPolicy {
        self.reveal_policy
    }

    /// Stored status (see [`Self::effective_status`]).
    #[must_use]
    pub const fn status(&self) -> MissionStatus {
        self.status
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> ShowCategory {
        self.category
    }

    /// Show ID.
    #[must_use]
    pub fn show_id(&self) -> Option<&str> {
        self.show_id.as_deref()
    }

    /// Season type.
    #[must_use]
    pub const fn season_type(&self) -> SeasonType {
        self.season_type
    }

    /// Season number.
    #[must_use]
    pub const fn season_number(&self) -> Option<u32> {
        self.season_number
    }

    /// Creator.
    #[must_use]
    pub const fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    /// Options.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Match participants.
    #[must_use]
    pub const fn match_candidates(&self) -> Option<&MatchCandidates> {
        self.match_candidates.as_ref()
    }

    /// Deadline.
    #[must_use]
    pub const fn deadline(&self) -> Timestamp {
        self.deadline
    }

    /// Episodes of a match mission (0 otherwise).
    #[must_use]
    pub const fn total_episodes(&self) -> u32 {
        self.total_episodes
    }

    /// Episode statuses keyed by episode number.
    #[must_use]
    pub const fn episode_statuses(&self) -> &BTreeMap<u32, EpisodeStatus> {
        &self.episode_statuses
    }

    /// Status of one episode.
    #[must_use]
    pub fn episode_status(&self, episode_no: u32) -> Option<EpisodeStatus> {
        self.episode_statuses.get(&episode_no).copied()
    }

    /// Broadcast slot.
    #[must_use]
    pub const fn broadcast(&self) -> Option<BroadcastSchedule> {
        self.broadcast
    }

    /// Correct answer (predict missions).
    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }

    /// Majority option from the latest tally.
    #[must_use]
    pub fn majority_option(&self) -> Option<&str> {
        self.majority_option.as_deref()
    }

    /// Final couples (match missions).
    #[must_use]
    pub fn final_answer(&self) -> &[MatchPair] {
        &self.final_answer
    }

    /// Percentage per option from the latest tally.
    #[must_use]
    pub const fn option_vote_counts(&self) -> &BTreeMap<String, u32> {
        &self.option_vote_counts
    }

    /// Participation counters.
    #[must_use]
    pub const fn stats(&self) -> MissionStats {
        self.stats
    }

    /// Whether points were paid out.
    #[must_use]
    pub const fn points_distributed(&self) -> bool {
        self.points_distributed
    }

    /// Whether the deadline notification went out.
    #[must_use]
    pub const fn deadline_notified(&self) -> bool {
        self.deadline_notified
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Storage version. Saving a copy whose version is behind the stored
    /// one is a conflict.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Persisted form of the aggregate, used by storage adapters.
    #[must_use]
    pub fn to_params(&self) -> ReconstitutedMissionParams {
        ReconstitutedMissionParams {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind,
            form: self.form,
            reveal_policy: self.reveal_policy,
            status: self.status,
            category: self.category,
            show_id: self.show_id.clone(),
            season_type: self.season_type,
            season_number: self.season_number,
            creator_id: self.creator_id.clone(),
            options: self.options.clone(),
            match_candidates: self.match_candidates.clone(),
            deadline: self.deadline,
            total_episodes: self.total_episodes,
            episode_statuses: self.episode_statuses.clone(),
            broadcast: self.broadcast,
            correct_answer: self.correct_answer.clone(),
            majority_option: self.majority_option.clone(),
            final_answer: self.final_answer.clone(),
            option_vote_counts: self.option_vote_counts.clone(),
            stats: self.stats,
            points_distributed: self.points_distributed,
            deadline_notified: self.deadline_notified,
            last_auto_opened_on: self.last_auto_opened_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Status as observed at `now`: an open mission past its deadline is closed.
    #[must_use]
    pub fn effective_status(&self, now: Timestamp) -> MissionStatus {
        match self.status {
            MissionStatus::Open if now >= self.deadline => MissionStatus::Closed,
            status => status,
        }
    }

    /// Whether a pick submitted at `now` is accepted.
    #[must_use]
    pub fn accepts_picks(&self, now: Timestamp) -> bool {
        self.effective_status(now) == MissionStatus::Open
    }

    /// Whether per-option results may be shown at `now`.
    #[must_use]
    pub fn results_visible(&self, now: Timestamp) -> bool {
        match self.reveal_policy {
            RevealPolicy::Realtime => true,
            RevealPolicy::OnClose => self.effective_status(now) != MissionStatus::Open,
        }
    }

    /// Whether `option` is one of the mission's options.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Answer picks are scored against: the correct answer for predict
    /// missions, the majority option for majority missions.
    #[must_use]
    pub fn settlement_answer(&self) -> Option<&str> {
        match self.kind {
            MissionKind::Predict => self.correct_answer(),
            MissionKind::Majority => self.majority_option(),
        }
    }

    /// Whether a majority mission should settle itself at `now`.
    #[must_use]
    pub fn should_auto_settle(&self, now: Timestamp) -> bool {
        self.kind == MissionKind::Majority
            && !self.form.is_match()
            && self.status != MissionStatus::Settled
            && self.majority_option.is_some()
            && now >= self.deadline
    }

    /// Episode the broadcast schedule opens at `now`, if any.
    ///
    /// At most one episode opens per broadcast day.
    #[must_use]
    pub fn episode_due_to_open(&self, now: Timestamp) -> Option<u32> {
        if !self.form.is_match() || self.status != MissionStatus::Open {
            return None;
        }
        let schedule = self.broadcast?;
        let local = now.to_kst();
        if local.weekday() == schedule.day() && local.time() >= schedule.time() {
            if self.last_auto_opened_on == Some(local.date_naive()) {
                return None;
            }
            let next = self.episode_statuses.keys().next_back().map_or(1, |ep| ep + 1);
            if next > self.total_episodes || self.episode_statuses.contains_key(&next) {
                return None;
            }
            return Some(next);
        }
        None
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Record the latest option tally.
    pub fn apply_tally(&mut self, tally: &OptionTally, participants: u64) {
        self.option_vote_counts = tally.percentages().into_iter().collect();
        self.majority_option = tally.majority().map(str::to_string);
        self.stats = MissionStats {
            participants,
            total_votes: tally.total_votes(),
        };
        self.touch();
    }

    /// Record match participation counters.
    pub fn apply_match_stats(&mut self, participants: u64, total_votes: u64) {
        self.stats = MissionStats {
            participants,
            total_votes,
        };
        self.touch();
    }

    /// Close an open mission whose deadline passed.
    pub fn close(&mut self) -> Result<(), MissionError> {
        match self.status {
            MissionStatus::Open => {
                self.status = MissionStatus::Closed;
                self.touch();
                Ok(())
            }
            MissionStatus::Closed => Ok(()),
            MissionStatus::Settled => Err(MissionError::InvalidStateTransition {
                from: self.status,
                to: MissionStatus::Closed,
                reason: "Mission is already settled".to_string(),
            }),
        }
    }

    /// Submit the correct answer of a predict mission and settle it.
    pub fn submit_answer(&mut self, user_id: &UserId, answer: &str) -> Result<(), MissionError> {
        let answer = self.check_answer(user_id, answer)?;
        self.ensure_not_settled()?;
        self.correct_answer = Some(answer.clone());
        self.settle(Some(answer));
        Ok(())
    }

    /// Replace the answer of an already settled predict mission.
    ///
    /// Points are not redistributed.
    pub fn update_answer(&mut self, user_id: &UserId, answer: &str) -> Result<(), MissionError> {
        let answer = self.check_answer(user_id, answer)?;
        if self.status != MissionStatus::Settled {
            return Err(MissionError::InvalidStateTransition {
                from: self.status,
                to: MissionStatus::Settled,
                reason: "Only settled missions can have their answer updated".to_string(),
            });
        }
        self.correct_answer = Some(answer);
        self.touch();
        Ok(())
    }

    /// Settle a majority mission with its tallied majority option.
    ///
    /// Returns `false` when there is nothing to settle with yet.
    pub fn settle_with_majority(&mut self) -> Result<bool, MissionError> {
        if self.kind != MissionKind::Majority {
            return Err(self.unsupported("majority settlement"));
        }
        self.ensure_not_settled()?;
        let Some(majority) = self.majority_option.clone() else {
            return Ok(false);
        };
        self.settle(Some(majority));
        Ok(true)
    }

    /// Store the final couples of a match mission and settle it.
    pub fn settle_match(
        &mut self,
        user_id: &UserId,
        final_answer: &[MatchPair],
    ) -> Result<(), MissionError> {
        if !self.form.is_match() {
            return Err(self.unsupported("final answer"));
        }
        self.ensure_creator(user_id)?;
        self.ensure_not_settled()?;
        let pairs: Vec<MatchPair> = final_answer.iter().filter_map(MatchPair::sanitized).collect();
        if pairs.is_empty() {
            return Err(invalid("final_answer", "At least one couple is required"));
        }
        self.final_answer = pairs;
        self.settle(None);
        Ok(())
    }

    /// Change the status of one match episode.
    ///
    /// Returns `true` when this change settled the whole mission.
    pub fn set_episode_status(
        &mut self,
        episode_no: u32,
        status: EpisodeStatus,
        now: Timestamp,
    ) -> Result<bool, MissionError> {
        if !self.form.is_match() {
            return Err(self.unsupported("episode status"));
        }
        if episode_no == 0 || episode_no > self.total_episodes {
            return Err(MissionError::EpisodeOutOfRange {
                episode: episode_no,
                total: self.total_episodes,
            });
        }

        self.episode_statuses.insert(episode_no, status);
        self.events
            .push(MissionEvent::EpisodeStatusChanged(EpisodeStatusChanged {
                mission_id: self.id.clone(),
                episode_no,
                status,
                occurred_at: now,
            }));
        self.touch();

        let all_settled = (1..=self.total_episodes)
            .all(|ep| self.episode_statuses.get(&ep) == Some(&EpisodeStatus::Settled));
        if all_settled && self.status != MissionStatus::Settled {
            self.settle(None);
            return Ok(true);
        }
        Ok(false)
    }

    /// Open the episode due per the broadcast schedule.
    pub fn open_scheduled_episode(&mut self, now: Timestamp) -> Option<u32> {
        let episode = self.episode_due_to_open(now)?;
        self.episode_statuses.insert(episode, EpisodeStatus::Open);
        self.last_auto_opened_on = Some(now.to_kst().date_naive());
        self.events
            .push(MissionEvent::EpisodeStatusChanged(EpisodeStatusChanged {
                mission_id: self.id.clone(),
                episode_no: episode,
                status: EpisodeStatus::Open,
                occurred_at: now,
            }));
        self.touch();
        Some(episode)
    }

    /// Mark points as paid. Returns `false` if they already were.
    pub fn mark_points_distributed(&mut self) -> bool {
        if self.points_distributed {
            return false;
        }
        self.points_distributed = true;
        self.touch();
        true
    }

    /// Mark the deadline notification as sent. Returns `false` if it already was.
    pub fn mark_deadline_notified(&mut self) -> bool {
        if self.deadline_notified {
            return false;
        }
        self.deadline_notified = true;
        self.touch();
        true
    }

    /// Take the pending domain events.
    pub fn drain_events(&mut self) -> Vec<MissionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the storage version after a successful save.
    pub const fn mark_saved(&mut self) {
        self.version += 1;
    }

    /// Replace this copy with the stored state, keeping unpublished events.
    pub fn catch_up(&mut self, stored: Self) {
        let events = std::mem::take(&mut self.events);
        *self = stored;
        self.events = events;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn settle(&mut self, answer: Option<String>) {
        self.status = MissionStatus::Settled;
        self.touch();
        self.events.push(MissionEvent::Settled(MissionSettled {
            mission_id: self.id.clone(),
            answer,
            occurred_at: self.updated_at,
        }));
    }

    fn check_answer(&self, user_id: &UserId, answer: &str) -> Result<String, MissionError> {
        if self.kind != MissionKind::Predict || self.form.is_match() {
            return Err(self.unsupported("answer submission"));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(invalid("answer", "Answer must not be blank"));
        }
        self.ensure_creator(user_id)?;
        if !self.options.is_empty() && !self.has_option(answer) {
            return Err(invalid("answer", format!("'{answer}' is not an option")));
        }
        Ok(answer.to_string())
    }

    fn ensure_creator(&self, user_id: &UserId) -> Result<(), MissionError> {
        if &self.creator_id != user_id {
            return Err(MissionError::NotCreator {
                mission_id: self.id.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_not_settled(&self) -> Result<(), MissionError> {
        if self.status == MissionStatus::Settled {
            return Err(MissionError::InvalidStateTransition {
                from: self.status,
                to: MissionStatus::Settled,
                reason: "Mission is already settled".to_string(),
            });
        }
        Ok(())
    }

    fn unsupported(&self, operation: &str) -> MissionError {
        MissionError::Unsupported {
            mission_id: self.id.to_string(),
            operation: operation.to_string(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, Weekday};

    fn now() -> Timestamp {
        Timestamp::parse("2026-03-02T03:00:00Z").unwrap()
    }

    fn binary_cmd(kind: MissionKind) -> CreateMissionCommand {
        CreateMissionCommand {
            title: "영수는 옥순을 선택할까?".to_string(),
            description: None,
            kind,
            form: MissionForm::Binary,
            reveal_policy: RevealPolicy::Realtime,
            category: ShowCategory::Love,
            show_id: Some("nasolo".to_string()),
            season_type: SeasonType::PerSeason,
            season_number: Some(28),
            creator_id: UserId::new("creator"),
            options: vec!["예".to_string(), "아니오".to_string()],
            match_candidates: None,
            deadline: now().plus(Duration::days(1)),
            total_episodes: None,
            broadcast: None,
        }
    }

    fn match_cmd() -> CreateMissionCommand {
        CreateMissionCommand {
            form: MissionForm::Match,
            kind: MissionKind::Predict,
            options: Vec::new(),
            match_candidates: Some(MatchCandidates {
                left: vec!["영수".into(), "영호".into()],
                right: vec!["영숙".into(), "옥순".into()],
            }),
            total_episodes: Some(2),
            ..binary_cmd(MissionKind::Predict)
        }
    }

    #[test]
    fn create_emits_event_and_zeroes_counts() {
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        assert_eq!(mission.status(), MissionStatus::Open);
        assert_eq!(mission.option_vote_counts().get("예"), Some(&0));
        let events = mission.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "mission.created");
        assert!(mission.drain_events().is_empty());
    }

    #[test]
    fn create_rejects_bad_option_counts() {
        let mut cmd = binary_cmd(MissionKind::Predict);
        cmd.options.push("몰라".to_string());
        assert!(matches!(
            Mission::create(cmd, now()),
            Err(MissionError::InvalidParameters { field, .. }) if field == "options"
        ));

        let mut cmd = binary_cmd(MissionKind::Predict);
        cmd.form = MissionForm::Multi;
        assert!(Mission::create(cmd, now()).is_err());
    }

    #[test]
    fn create_rejects_past_deadline_and_unknown_show() {
        let mut cmd = binary_cmd(MissionKind::Predict);
        cmd.deadline = now();
        assert!(Mission::create(cmd, now()).is_err());

        let mut cmd = binary_cmd(MissionKind::Predict);
        cmd.show_id = Some("unknown".to_string());
        assert!(Mission::create(cmd, now()).is_err());
    }

    #[test]
    fn create_requires_season_number_for_per_season() {
        let mut cmd = binary_cmd(MissionKind::Predict);
        cmd.season_number = None;
        assert!(Mission::create(cmd, now()).is_err());
    }

    #[test]
    fn majority_subjective_is_rejected() {
        let mut cmd = binary_cmd(MissionKind::Majority);
        cmd.form = MissionForm::Subjective;
        cmd.options.clear();
        assert!(Mission::create(cmd, now()).is_err());
    }

    #[test]
    fn effective_status_closes_after_deadline() {
        let mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        assert!(mission.accepts_picks(now()));
        let later = mission.deadline().plus(Duration::seconds(1));
        assert_eq!(mission.effective_status(later), MissionStatus::Closed);
        assert!(!mission.accepts_picks(later));
    }

    #[test]
    fn on_close_results_hidden_until_deadline() {
        let mut cmd = binary_cmd(MissionKind::Predict);
        cmd.reveal_policy = RevealPolicy::OnClose;
        let mission = Mission::create(cmd, now()).unwrap();
        assert!(!mission.results_visible(now()));
        assert!(mission.results_visible(mission.deadline()));
    }

    #[test]
    fn submit_answer_requires_creator_and_option() {
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        assert_eq!(
            mission.submit_answer(&UserId::new("someone"), "예"),
            Err(MissionError::NotCreator {
                mission_id: mission.id().to_string()
            })
        );
        assert!(mission.submit_answer(&UserId::new("creator"), "  ").is_err());
        assert!(mission.submit_answer(&UserId::new("creator"), "글쎄").is_err());

        mission.submit_answer(&UserId::new("creator"), " 예 ").unwrap();
        assert_eq!(mission.status(), MissionStatus::Settled);
        assert_eq!(mission.settlement_answer(), Some("예"));
    }

    #[test]
    fn submit_answer_twice_is_rejected() {
        let creator = UserId::new("creator");
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        mission.submit_answer(&creator, "예").unwrap();
        assert!(matches!(
            mission.submit_answer(&creator, "아니오"),
            Err(MissionError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn update_answer_only_after_settlement() {
        let creator = UserId::new("creator");
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        assert!(mission.update_answer(&creator, "예").is_err());

        mission.submit_answer(&creator, "예").unwrap();
        mission.update_answer(&creator, "아니오").unwrap();
        assert_eq!(mission.correct_answer(), Some("아니오"));
    }

    #[test]
    fn majority_settles_from_tally() {
        let mut mission = Mission::create(binary_cmd(MissionKind::Majority), now()).unwrap();
        assert!(!mission.settle_with_majority().unwrap());

        let votes = ["예", "아니오", "예"];
        let tally = OptionTally::compute(mission.options(), votes.iter().copied());
        mission.apply_tally(&tally, 3);
        assert_eq!(mission.majority_option(), Some("예"));
        assert!(!mission.should_auto_settle(now()));
        assert!(mission.should_auto_settle(mission.deadline()));

        assert!(mission.settle_with_majority().unwrap());
        assert_eq!(mission.settlement_answer(), Some("예"));
        assert!(!mission.should_auto_settle(mission.deadline()));
    }

    #[test]
    fn close_is_idempotent_but_not_after_settle() {
        let creator = UserId::new("creator");
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        mission.close().unwrap();
        mission.close().unwrap();
        mission.submit_answer(&creator, "예").unwrap();
        assert!(mission.close().is_err());
    }

    #[test]
    fn match_mission_defaults_and_final_answer() {
        let creator = UserId::new("creator");
        let mut cmd = match_cmd();
        cmd.total_episodes = None;
        let mut mission = Mission::create(cmd, now()).unwrap();
        assert_eq!(mission.total_episodes(), DEFAULT_TOTAL_EPISODES);
        assert_eq!(mission.episode_status(1), Some(EpisodeStatus::Open));

        assert!(mission
            .settle_match(&creator, &[MatchPair::new(" ", "영숙")])
            .is_err());
        mission
            .settle_match(&creator, &[MatchPair::new(" 영수", "영숙 "), MatchPair::new("", "x")])
            .unwrap();
        assert_eq!(mission.final_answer(), &[MatchPair::new("영수", "영숙")]);
        assert_eq!(mission.status(), MissionStatus::Settled);
    }

    #[test]
    fn settling_all_episodes_settles_mission() {
        let mut mission = Mission::create(match_cmd(), now()).unwrap();
        assert!(!mission.set_episode_status(1, EpisodeStatus::Settled, now()).unwrap());
        assert!(mission.set_episode_status(2, EpisodeStatus::Settled, now()).unwrap());
        assert_eq!(mission.status(), MissionStatus::Settled);
        assert!(matches!(
            mission.set_episode_status(3, EpisodeStatus::Open, now()),
            Err(MissionError::EpisodeOutOfRange { episode: 3, total: 2 })
        ));
    }

    #[test]
    fn broadcast_schedule_opens_one_episode_per_day() {
        let mut cmd = match_cmd();
        cmd.broadcast = Some(BroadcastSchedule::new(
            Weekday::Wed,
            NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        ));
        let mut mission = Mission::create(cmd, now()).unwrap();
        assert!(mission.episode_statuses().is_empty());

        // 2026-03-04 is a Wednesday; 13:00Z is 22:00 KST.
        let before = Timestamp::parse("2026-03-04T13:00:00Z").unwrap();
        assert_eq!(mission.open_scheduled_episode(before), None);

        let after = Timestamp::parse("2026-03-04T13:45:00Z").unwrap();
        assert_eq!(mission.open_scheduled_episode(after), Some(1));
        let hour_later = after.plus(Duration::hours(1));
        assert_eq!(mission.open_scheduled_episode(hour_later), None);

        let next_week = after.plus(Duration::days(7));
        assert_eq!(mission.open_scheduled_episode(next_week), Some(2));
        let week_after = next_week.plus(Duration::days(7));
        assert_eq!(mission.open_scheduled_episode(week_after), None);
    }

    #[test]
    fn points_distribution_flag_is_one_shot() {
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        assert!(mission.mark_points_distributed());
        assert!(!mission.mark_points_distributed());
    }

    #[test]
    fn reconstitute_round_trips_params() {
        let mut mission = Mission::create(binary_cmd(MissionKind::Predict), now()).unwrap();
        mission.drain_events();
        let mut copy = Mission::reconstitute(mission.to_params());
        assert_eq!(copy.id(), mission.id());
        assert_eq!(copy.options(), mission.options());
        assert!(copy.drain_events().is_empty());
    }
}
