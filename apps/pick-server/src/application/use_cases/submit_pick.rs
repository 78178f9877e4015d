//! Submit Pick Use Case
//!
//! Records a viewer's pick and refreshes the mission's counters.

use std::sync::Arc;

use crate::application::dto::PickReceiptDto;
use crate::domain::mission::{
    EpisodeStatus, MatchPair, Mission, MissionForm, MissionRepository, update_mission,
};
use crate::domain::pick::{MatchPick, Pick, PickError, PickRepository};
use crate::domain::shared::{MissionId, Timestamp, UserId};
use crate::domain::tally::OptionTally;
use crate::domain::user::UserRepository;
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Use case for submitting picks and match picks.
pub struct SubmitPickUseCase {
    missions: Arc<dyn MissionRepository>,
    picks: Arc<dyn PickRepository>,
    users: Arc<dyn UserRepository>,
}

impl SubmitPickUseCase {
    /// Create a new `SubmitPickUseCase`.
    pub const fn new(
        missions: Arc<dyn MissionRepository>,
        picks: Arc<dyn PickRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            missions,
            picks,
            users,
        }
    }

    /// Submit or replace a pick on a binary, multi or subjective mission.
    ///
    /// # Errors
    ///
    /// Returns error if the mission is closed, the option is unknown or the
    /// mission takes match picks.
    pub async fn submit_pick(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        selected_option: &str,
    ) -> Result<PickReceiptDto, ServiceError> {
        let now = Timestamp::now();

        // 1. Load and check the mission
        let mission = self.open_mission(mission_id, user_id, now).await?;
        if mission.form().is_match() {
            return Err(PickError::WrongForm {
                mission_id: mission_id.to_string(),
                expected: "match pick".to_string(),
            }
            .into());
        }

        // 2. Validate the answer
        let pick = Pick::new(mission_id.clone(), user_id.clone(), selected_option, now)?;
        if mission.form() != MissionForm::Subjective && !mission.has_option(pick.selected_option())
        {
            return Err(PickError::UnknownOption {
                option: pick.selected_option().to_string(),
            }
            .into());
        }

        // 3. Upsert (one pick per user and mission)
        let first_pick = self.picks.upsert_pick(pick).await?;

        // 4. Recount
        let picks = self.picks.list_picks(mission_id).await?;
        let tally = OptionTally::compute(mission.options(), picks.iter().map(Pick::selected_option));
        let participants = picks.len() as u64;
        let mission = self
            .save_counters(mission_id, |m| m.apply_tally(&tally, participants))
            .await?;

        metrics::record_pick(&mission.form().to_string());
        tracing::debug!(
            mission_id = %mission_id,
            user_id = %user_id,
            first_pick,
            "Pick recorded"
        );

        Ok(receipt(&mission, user_id, first_pick))
    }

    /// Submit or replace a user's couples for one episode of a match mission.
    ///
    /// # Errors
    ///
    /// Returns error if the mission is closed, the episode is not open or a
    /// couple uses an unknown participant.
    pub async fn submit_match_pick(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        episode_no: u32,
        pairs: Vec<MatchPair>,
    ) -> Result<PickReceiptDto, ServiceError> {
        let now = Timestamp::now();

        // 1. Load and check the mission
        let mission = self.open_mission(mission_id, user_id, now).await?;
        if !mission.form().is_match() {
            return Err(PickError::WrongForm {
                mission_id: mission_id.to_string(),
                expected: "single pick".to_string(),
            }
            .into());
        }
        if mission.episode_status(episode_no) != Some(EpisodeStatus::Open) {
            return Err(PickError::EpisodeNotOpen { episode_no }.into());
        }

        // 2. Validate couples against the candidate lists
        let pick = MatchPick::new(mission_id.clone(), user_id.clone(), episode_no, pairs, now)?;
        if let Some(candidates) = mission.match_candidates()
            && let Some(stranger) = pick.pairs().iter().find(|p| !candidates.contains(p))
        {
            return Err(PickError::UnknownOption {
                option: stranger.key(),
            }
            .into());
        }

        // 3. Upsert (one pick per user, mission and episode)
        let first_pick = self.picks.upsert_match_pick(pick).await?;

        // 4. Recount
        let total_votes = self.picks.list_match_picks(mission_id).await?.len() as u64;
        let participants = self.picks.participants(mission_id).await?.len() as u64;
        let mission = self
            .save_counters(mission_id, |m| m.apply_match_stats(participants, total_votes))
            .await?;

        metrics::record_pick(&mission.form().to_string());
        tracing::debug!(
            mission_id = %mission_id,
            user_id = %user_id,
            episode_no,
            first_pick,
            "Match pick recorded"
        );

        Ok(receipt(&mission, user_id, first_pick))
    }

    async fn open_mission(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Mission, ServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }
        let mission = self
            .missions
            .find_by_id(mission_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mission", mission_id))?;
        if !mission.accepts_picks(now) {
            return Err(PickError::MissionClosed {
                mission_id: mission_id.to_string(),
            }
            .into());
        }
        Ok(mission)
    }

    /// Apply fresh counters to the stored mission, retrying on a concurrent write.
    async fn save_counters(
        &self,
        mission_id: &MissionId,
        mut apply: impl FnMut(&mut Mission) + Send,
    ) -> Result<Mission, ServiceError> {
        update_mission(self.missions.as_ref(), mission_id, |m| {
            apply(m);
            Ok::<_, ServiceError>(())
        })
        .await?
        .map(|(mission, ())| mission)
        .ok_or_else(|| ServiceError::not_found("Mission", mission_id))
    }
}

fn receipt(mission: &Mission, user_id: &UserId, first_pick: bool) -> PickReceiptDto {
    let stats = mission.stats();
    PickReceiptDto {
        mission_id: mission.id().to_string(),
        user_id: user_id.to_string(),
        first_pick,
        participants: stats.participants,
        total_votes: stats.total_votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{self, Fixture};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn resubmission_replaces_pick() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        let use_case = fx.submit_pick();
        let u1 = UserId::new("u1");

        let first = use_case.submit_pick(mission.id(), &u1, "예").await.unwrap();
        assert!(first.first_pick);
        let second = use_case.submit_pick(mission.id(), &u1, "아니오").await.unwrap();
        assert!(!second.first_pick);
        assert_eq!(second.total_votes, 1);
        assert_eq!(second.participants, 1);

        let stored = fx.missions.find_by_id(mission.id()).await.unwrap().unwrap();
        assert_eq!(stored.option_vote_counts().get("아니오"), Some(&100));
    }

    #[tokio::test]
    async fn unknown_option_is_rejected() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        let err = fx
            .submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "몰라")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPick);
    }

    #[tokio::test]
    async fn closed_mission_rejects_picks() {
        let fx = Fixture::new().await;
        let mission = test_support::expired_binary(&fx).await;
        let err = fx
            .submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "예")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissionClosed);
    }

    #[tokio::test]
    async fn match_pick_needs_open_episode_and_known_names() {
        let fx = Fixture::new().await;
        let mission = test_support::match_mission(&fx).await;
        let use_case = fx.submit_pick();
        let u1 = UserId::new("u1");

        let receipt = use_case
            .submit_match_pick(mission.id(), &u1, 1, vec![MatchPair::new("영수", "옥순")])
            .await
            .unwrap();
        assert!(receipt.first_pick);
        assert_eq!(receipt.participants, 1);

        let err = use_case
            .submit_match_pick(mission.id(), &u1, 2, vec![MatchPair::new("영수", "옥순")])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissionClosed);

        let err = use_case
            .submit_match_pick(mission.id(), &u1, 1, vec![MatchPair::new("철수", "옥순")])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPick);
    }

    #[tokio::test]
    async fn wrong_form_is_rejected() {
        let fx = Fixture::new().await;
        let mission = test_support::match_mission(&fx).await;
        let err = fx
            .submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "영수")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPick);
    }
}
