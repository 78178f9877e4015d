//! Settle Mission Use Case
//!
//! Creator-driven settlement: predict answers, final couples and
//! per-episode status changes of match missions.

use std::sync::Arc;

use super::DistributePointsUseCase;
use crate::application::dto::{MissionDto, SettlementDto};
use crate::application::ports::EventPublisherPort;
use crate::domain::mission::{
    EpisodeStatus, MatchPair, Mission, MissionError, MissionRepository, update_mission,
};
use crate::domain::shared::{MissionId, Timestamp, UserId};
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Use case for settling missions.
pub struct SettleMissionUseCase {
    missions: Arc<dyn MissionRepository>,
    distributor: Arc<DistributePointsUseCase>,
    event_publisher: Arc<dyn EventPublisherPort>,
}

impl SettleMissionUseCase {
    /// Create a new `SettleMissionUseCase`.
    pub const fn new(
        missions: Arc<dyn MissionRepository>,
        distributor: Arc<DistributePointsUseCase>,
        event_publisher: Arc<dyn EventPublisherPort>,
    ) -> Self {
        Self {
            missions,
            distributor,
            event_publisher,
        }
    }

    /// Submit the correct answer of a predict mission and pay out.
    ///
    /// # Errors
    ///
    /// Returns error if the caller is not the creator, the mission is not a
    /// predict mission, is already settled or the answer is not an option.
    pub async fn submit_answer(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        answer: &str,
    ) -> Result<SettlementDto, ServiceError> {
        let (mission, ()) = self
            .update(mission_id, |m| m.submit_answer(user_id, answer))
            .await?;
        metrics::record_mission_settled("predict");
        self.finish(mission).await
    }

    /// Replace the answer of a settled predict mission. Points stay as paid.
    ///
    /// # Errors
    ///
    /// Returns error if the caller is not the creator or the mission is not settled.
    pub async fn update_answer(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        answer: &str,
    ) -> Result<MissionDto, ServiceError> {
        let (mission, ()) = self
            .update(mission_id, |m| m.update_answer(user_id, answer))
            .await?;
        tracing::info!(mission_id = %mission_id, "Predict answer updated");
        Ok(MissionDto::from_mission(&mission, Timestamp::now()))
    }

    /// Store the final couples of a match mission and pay out per episode.
    ///
    /// # Errors
    ///
    /// Returns error if the caller is not the creator, no couple survives
    /// sanitizing or the mission is already settled.
    pub async fn settle_match(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        final_answer: &[MatchPair],
    ) -> Result<SettlementDto, ServiceError> {
        let (mission, ()) = self
            .update(mission_id, |m| m.settle_match(user_id, final_answer))
            .await?;
        metrics::record_mission_settled("match");
        self.finish(mission).await
    }

    /// Change one episode's status. Settling the last episode settles the
    /// mission and pays out when final couples are known.
    ///
    /// # Errors
    ///
    /// Returns error if the mission is not a match mission or the episode is
    /// out of range.
    pub async fn update_episode_status(
        &self,
        mission_id: &MissionId,
        episode_no: u32,
        status: EpisodeStatus,
    ) -> Result<SettlementDto, ServiceError> {
        let now = Timestamp::now();
        let (mission, settled) = self
            .update(mission_id, |m| m.set_episode_status(episode_no, status, now))
            .await?;
        tracing::info!(
            mission_id = %mission_id,
            episode_no,
            status = %status,
            "Episode status changed"
        );
        if settled {
            metrics::record_mission_settled("match");
        }
        self.finish(mission).await
    }

    async fn finish(&self, mut mission: Mission) -> Result<SettlementDto, ServiceError> {
        // 1. Pay out (no-op unless settled with an answer, and only once)
        let point_logs_written = self.distributor.distribute(&mut mission).await?;

        // 2. Publish events
        let events = mission.drain_events();
        if let Err(e) = self.event_publisher.publish_mission_events(events).await {
            tracing::error!("Failed to publish settlement events: {}", e);
        }

        Ok(SettlementDto {
            mission_id: mission.id().to_string(),
            status: mission.status(),
            point_logs_written,
        })
    }

    /// Apply `change` to the stored mission and save it, retrying on a
    /// concurrent write.
    async fn update<T>(
        &self,
        id: &MissionId,
        mut change: impl FnMut(&mut Mission) -> Result<T, MissionError> + Send,
    ) -> Result<(Mission, T), ServiceError> {
        update_mission(self.missions.as_ref(), id, |m| {
            change(m).map_err(ServiceError::from)
        })
        .await?
        .ok_or_else(|| ServiceError::not_found("Mission", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{self, Fixture};
    use crate::domain::shared::DomainError;
    use crate::domain::mission::MissionStatus;
    use crate::domain::user::UserRepository;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn creator_settles_predict_mission() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        fx.submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "예")
            .await
            .unwrap();

        let dto = fx
            .settle_mission()
            .submit_answer(mission.id(), &UserId::new("creator"), "예")
            .await
            .unwrap();
        assert_eq!(dto.status, MissionStatus::Settled);
        assert_eq!(dto.point_logs_written, 1);
        assert_eq!(fx.events.published().len(), 1);
    }

    #[tokio::test]
    async fn non_creator_cannot_answer() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        let err = fx
            .settle_mission()
            .submit_answer(mission.id(), &UserId::new("u1"), "예")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn answer_update_does_not_repay() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        let creator = UserId::new("creator");
        fx.submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "아니오")
            .await
            .unwrap();
        let settle = fx.settle_mission();
        settle.submit_answer(mission.id(), &creator, "예").await.unwrap();

        let updated = settle
            .update_answer(mission.id(), &creator, "아니오")
            .await
            .unwrap();
        assert_eq!(updated.correct_answer.as_deref(), Some("아니오"));
        let u1 = fx.users.find_by_id(&UserId::new("u1")).await.unwrap().unwrap();
        assert_eq!(u1.points(), 0);
    }

    #[tokio::test]
    async fn read_copy_saved_after_settlement_is_rejected() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        fx.submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "예")
            .await
            .unwrap();
        let mut read_copy = fx.missions.find_by_id(mission.id()).await.unwrap().unwrap();

        let settle = fx.settle_mission();
        let creator = UserId::new("creator");
        settle.submit_answer(mission.id(), &creator, "예").await.unwrap();

        // The copy loaded before settlement cannot reopen the mission
        let err = fx.missions.save(&mut read_copy).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        let stored = fx.missions.find_by_id(mission.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), MissionStatus::Settled);
        assert!(stored.points_distributed());

        let again = settle.submit_answer(mission.id(), &creator, "예").await.unwrap_err();
        assert_eq!(again.code(), ErrorCode::Conflict);
        let u1 = fx.users.find_by_id(&UserId::new("u1")).await.unwrap().unwrap();
        assert_eq!(u1.points(), 10);
    }

    #[tokio::test]
    async fn settling_last_episode_settles_mission() {
        let fx = Fixture::new().await;
        let mut cmd = test_support::match_command(UserId::new("creator"));
        cmd.total_episodes = Some(2);
        let mission = test_support::save_new(&fx, cmd).await;
        let settle = fx.settle_mission();

        let first = settle
            .update_episode_status(mission.id(), 1, EpisodeStatus::Settled)
            .await
            .unwrap();
        assert_eq!(first.status, MissionStatus::Open);

        let last = settle
            .update_episode_status(mission.id(), 2, EpisodeStatus::Settled)
            .await
            .unwrap();
        assert_eq!(last.status, MissionStatus::Settled);
        assert_eq!(last.point_logs_written, 0);
    }

    #[tokio::test]
    async fn episode_out_of_range_is_bad_request() {
        let fx = Fixture::new().await;
        let mission = test_support::match_mission(&fx).await;
        let err = fx
            .settle_mission()
            .update_episode_status(mission.id(), 99, EpisodeStatus::Open)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
