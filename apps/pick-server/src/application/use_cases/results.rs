//! Results Use Case
//!
//! Tallies option and match missions. Reading the results of a majority
//! mission past its deadline settles it.

use std::sync::Arc;

use super::DistributePointsUseCase;
use crate::application::dto::{MatchResultsDto, MissionResultsDto, OptionResultDto};
use crate::application::ports::EventPublisherPort;
use crate::domain::mission::{Mission, MissionRepository, MissionStatus, update_mission};
use crate::domain::pick::{Pick, PickError, PickRepository};
use crate::domain::shared::{MissionId, Timestamp};
use crate::domain::tally::{EpisodeFilter, MatchTally, OptionTally, percentage};
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Use case for mission results.
pub struct ResultsUseCase {
    missions: Arc<dyn MissionRepository>,
    picks: Arc<dyn PickRepository>,
    distributor: Arc<DistributePointsUseCase>,
    event_publisher: Arc<dyn EventPublisherPort>,
}

impl ResultsUseCase {
    /// Create a new `ResultsUseCase`.
    pub const fn new(
        missions: Arc<dyn MissionRepository>,
        picks: Arc<dyn PickRepository>,
        distributor: Arc<DistributePointsUseCase>,
        event_publisher: Arc<dyn EventPublisherPort>,
    ) -> Self {
        Self {
            missions,
            picks,
            distributor,
            event_publisher,
        }
    }

    /// Results of a binary, multi or subjective mission.
    ///
    /// # Errors
    ///
    /// Returns error if the mission is unknown or is a match mission.
    pub async fn results(&self, mission_id: &MissionId) -> Result<MissionResultsDto, ServiceError> {
        let now = Timestamp::now();
        let mut mission = self.load(mission_id).await?;
        if mission.form().is_match() {
            return Err(PickError::WrongForm {
                mission_id: mission_id.to_string(),
                expected: "match results request".to_string(),
            }
            .into());
        }

        let tally = self.refresh_tally(&mut mission, now).await?;

        let revealed = mission.results_visible(now);
        let total = tally.total_votes();
        let options = if revealed {
            tally
                .counts()
                .iter()
                .map(|(option, count)| OptionResultDto {
                    option: option.clone(),
                    count: *count,
                    percentage: percentage(*count, total),
                })
                .collect()
        } else {
            Vec::new()
        };

        let stats = mission.stats();
        Ok(MissionResultsDto {
            mission_id: mission_id.to_string(),
            status: mission.effective_status(now),
            revealed,
            total_votes: stats.total_votes,
            participants: stats.participants,
            options,
            majority_option: revealed
                .then(|| mission.majority_option().map(str::to_string))
                .flatten(),
            correct_answer: mission
                .status()
                .is_terminal()
                .then(|| mission.settlement_answer().map(str::to_string))
                .flatten(),
        })
    }

    /// Recount a mission's picks, saving the counters and settling a
    /// majority mission whose deadline has passed.
    ///
    /// `mission` is replaced with the saved state. The counters are applied
    /// to a freshly loaded copy, so a concurrent settlement is never undone.
    ///
    /// # Errors
    ///
    /// Returns error if loading picks or saving fails.
    pub async fn refresh_tally(
        &self,
        mission: &mut Mission,
        now: Timestamp,
    ) -> Result<OptionTally, ServiceError> {
        // 1. Recount
        let picks = self.picks.list_picks(mission.id()).await?;
        let tally = OptionTally::compute(mission.options(), picks.iter().map(Pick::selected_option));
        let participants = picks.len() as u64;

        // 2. Persist counters, settling majority missions past their deadline
        let id = mission.id().clone();
        let (saved, settled) = update_mission(self.missions.as_ref(), &id, |current| {
            current.apply_tally(&tally, participants);
            let settled = current.should_auto_settle(now) && current.settle_with_majority()?;
            Ok::<_, ServiceError>(settled)
        })
        .await?
        .ok_or_else(|| ServiceError::not_found("Mission", &id))?;
        *mission = saved;

        // 3. Pay out, finishing a payout an earlier writer left unclaimed
        if settled {
            tracing::info!(
                mission_id = %mission.id(),
                majority = mission.majority_option().unwrap_or_default(),
                "Majority mission settled"
            );
            metrics::record_mission_settled("majority");
        }
        if mission.status() == MissionStatus::Settled && !mission.points_distributed() {
            self.distributor.distribute(mission).await?;
        }

        // 4. Publish events
        let events = mission.drain_events();
        if let Err(e) = self.event_publisher.publish_mission_events(events).await {
            tracing::error!("Failed to publish results events: {}", e);
        }

        Ok(tally)
    }

    /// Couple tally of a match mission over the selected episodes.
    ///
    /// # Errors
    ///
    /// Returns error if the mission is unknown or is not a match mission.
    pub async fn match_results(
        &self,
        mission_id: &MissionId,
        filter: &EpisodeFilter,
    ) -> Result<MatchResultsDto, ServiceError> {
        let mission = self.load(mission_id).await?;
        if !mission.form().is_match() {
            return Err(PickError::WrongForm {
                mission_id: mission_id.to_string(),
                expected: "results request".to_string(),
            }
            .into());
        }

        let picks = self.picks.list_match_picks(mission_id).await?;
        let tally = MatchTally::compute(&picks, filter);
        let settled = mission.status().is_terminal();

        Ok(MatchResultsDto {
            mission_id: mission_id.to_string(),
            status: mission.effective_status(Timestamp::now()),
            tally,
            episode_statuses: mission.episode_statuses().clone(),
            final_answer: if settled {
                mission.final_answer().to_vec()
            } else {
                Vec::new()
            },
        })
    }

    async fn load(&self, id: &MissionId) -> Result<Mission, ServiceError> {
        self.missions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mission", id))
    }
}
