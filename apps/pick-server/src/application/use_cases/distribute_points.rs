//! Distribute Points Use Case
//!
//! Turns a settled mission's picks into point-ledger entries.

use std::sync::Arc;

use crate::domain::mission::{Mission, MissionRepository, MissionStatus, SAVE_ATTEMPTS};
use crate::domain::pick::PickRepository;
use crate::domain::scoring::{
    MissionType, PointLog, PointLogMetadata, match_pick_points, match_reason, option_pick_points,
    option_reason,
};
use crate::domain::shared::DomainError;
use crate::domain::user::UserRepository;
use crate::infrastructure::metrics;

/// Use case for paying out a settled mission.
pub struct DistributePointsUseCase {
    missions: Arc<dyn MissionRepository>,
    picks: Arc<dyn PickRepository>,
    users: Arc<dyn UserRepository>,
}

impl DistributePointsUseCase {
    /// Create a new `DistributePointsUseCase`.
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

    /// Pay out `mission` once. Returns the number of ledger entries written.
    ///
    /// The mission is saved with its distributed flag set before any entry
    /// is written, so a second call writes nothing. Saves are versioned, so
    /// of two overlapping calls only one claims the payout.
    ///
    /// # Errors
    ///
    /// Returns error if loading picks or saving the mission fails.
    pub async fn distribute(&self, mission: &mut Mission) -> Result<usize, DomainError> {
        // 1. Only settled missions with something to score against pay out
        if mission.status() != MissionStatus::Settled || !has_answer(mission) {
            return Ok(0);
        }

        // 2. Claim the payout
        if !self.claim(mission).await? {
            tracing::debug!(mission_id = %mission.id(), "Points already distributed");
            return Ok(0);
        }

        // 3. Score every pick
        let logs = self.score(mission).await?;

        // 4. Apply ledger entries one user at a time
        let mut written = 0;
        for log in logs {
            let mission_type = log.mission_type;
            let diff = log.diff;
            match self.users.apply_point_log(log).await {
                Ok(_) => {
                    written += 1;
                    metrics::record_points(mission_type.as_str(), diff);
                }
                Err(DomainError::NotFound { id, .. }) => {
                    tracing::warn!(user_id = %id, "Skipping points for unknown user");
                }
                Err(e) => {
                    tracing::error!("Failed to apply point log: {}", e);
                }
            }
        }

        tracing::info!(
            mission_id = %mission.id(),
            entries = written,
            "Distributed mission points"
        );
        Ok(written)
    }

    /// Set and save the distributed flag, catching up with the stored
    /// mission when another writer saved first.
    async fn claim(&self, mission: &mut Mission) -> Result<bool, DomainError> {
        let mut attempt = 1;
        loop {
            if mission.status() != MissionStatus::Settled || !mission.mark_points_distributed() {
                return Ok(false);
            }
            match self.missions.save(mission).await {
                Ok(()) => return Ok(true),
                Err(DomainError::Conflict { .. }) if attempt < SAVE_ATTEMPTS => {
                    let stored = self
                        .missions
                        .find_by_id(mission.id())
                        .await?
                        .ok_or_else(|| DomainError::not_found("Mission", mission.id()))?;
                    mission.catch_up(stored);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn score(&self, mission: &Mission) -> Result<Vec<PointLog>, DomainError> {
        let mission_type = MissionType::for_form(mission.form());

        if mission.form().is_match() {
            let final_answer = mission.final_answer();
            let picks = self.picks.list_match_picks(mission.id()).await?;
            return Ok(picks
                .iter()
                .map(|pick| {
                    let correct = pick.covers(final_answer);
                    PointLog::new(
                        pick.user_id().clone(),
                        mission.id().clone(),
                        mission_type,
                        match_pick_points(pick.episode_no(), correct),
                        match_reason(pick.episode_no(), correct),
                        PointLogMetadata {
                            episode_no: Some(pick.episode_no()),
                        },
                    )
                })
                .collect());
        }

        let Some(answer) = mission.settlement_answer() else {
            return Ok(Vec::new());
        };
        let picks = self.picks.list_picks(mission.id()).await?;
        Ok(picks
            .iter()
            .filter_map(|pick| {
                let correct = pick.selected_option() == answer;
                let diff = option_pick_points(mission.form(), mission.options().len(), correct);
                (diff != 0).then(|| {
                    PointLog::new(
                        pick.user_id().clone(),
                        mission.id().clone(),
                        mission_type,
                        diff,
                        option_reason(mission.kind(), mission.form(), correct),
                        PointLogMetadata::default(),
                    )
                })
            })
            .collect())
    }
}

fn has_answer(mission: &Mission) -> bool {
    if mission.form().is_match() {
        !mission.final_answer().is_empty()
    } else {
        mission.settlement_answer().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{self, Fixture};
    use crate::domain::mission::MatchPair;
    use crate::domain::pick::{MatchPick, Pick};
    use crate::domain::shared::{Timestamp, UserId};

    #[tokio::test]
    async fn pays_correct_binary_picks_once() {
        let fx = Fixture::new().await;
        let mut mission = test_support::binary_predict(&fx).await;
        for (user, option) in [("u1", "예"), ("u2", "아니오")] {
            fx.picks
                .upsert_pick(Pick::new(mission.id().clone(), UserId::new(user), option, Timestamp::now()).unwrap())
                .await
                .unwrap();
        }
        mission.submit_answer(&UserId::new("creator"), "예").unwrap();

        let use_case = fx.distribute_points();
        assert_eq!(use_case.distribute(&mut mission).await.unwrap(), 1);
        assert_eq!(use_case.distribute(&mut mission).await.unwrap(), 0);

        let u1 = fx.users.find_by_id(&UserId::new("u1")).await.unwrap().unwrap();
        let u2 = fx.users.find_by_id(&UserId::new("u2")).await.unwrap().unwrap();
        assert_eq!(u1.points(), 10);
        assert_eq!(u2.points(), 0);
    }

    #[tokio::test]
    async fn match_picks_win_and_lose_episode_stakes() {
        let fx = Fixture::new().await;
        let mut mission = test_support::match_mission(&fx).await;
        let couple = MatchPair::new("영수", "옥순");
        fx.picks
            .upsert_match_pick(
                MatchPick::new(mission.id().clone(), UserId::new("u1"), 1, vec![couple.clone()], Timestamp::now())
                    .unwrap(),
            )
            .await
            .unwrap();
        fx.picks
            .upsert_match_pick(
                MatchPick::new(
                    mission.id().clone(),
                    UserId::new("u2"),
                    1,
                    vec![MatchPair::new("영호", "옥순")],
                    Timestamp::now(),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        mission
            .settle_match(&UserId::new("creator"), &[couple])
            .unwrap();

        assert_eq!(fx.distribute_points().distribute(&mut mission).await.unwrap(), 2);

        let logs = fx.users.point_logs(&UserId::new("u2"), 10).await.unwrap();
        assert_eq!(logs[0].diff, -100);
        assert_eq!(logs[0].metadata.episode_no, Some(1));
        let u1 = fx.users.find_by_id(&UserId::new("u1")).await.unwrap().unwrap();
        assert_eq!(u1.points(), 100);
    }

    #[tokio::test]
    async fn stale_copy_cannot_claim_twice() {
        let fx = Fixture::new().await;
        let mut mission = test_support::binary_predict(&fx).await;
        fx.picks
            .upsert_pick(Pick::new(mission.id().clone(), UserId::new("u1"), "예", Timestamp::now()).unwrap())
            .await
            .unwrap();
        mission.submit_answer(&UserId::new("creator"), "예").unwrap();
        fx.missions.save(&mut mission).await.unwrap();
        let mut stale = mission.clone();

        let use_case = fx.distribute_points();
        assert_eq!(use_case.distribute(&mut mission).await.unwrap(), 1);
        // The stale copy still says undistributed but loses the versioned save
        assert!(!stale.points_distributed());
        assert_eq!(use_case.distribute(&mut stale).await.unwrap(), 0);
        assert!(stale.points_distributed());

        let u1 = fx.users.find_by_id(&UserId::new("u1")).await.unwrap().unwrap();
        assert_eq!(u1.points(), 10);
    }

    #[tokio::test]
    async fn unsettled_mission_pays_nothing() {
        let fx = Fixture::new().await;
        let mut mission = test_support::binary_predict(&fx).await;
        assert_eq!(fx.distribute_points().distribute(&mut mission).await.unwrap(), 0);
        assert!(!mission.points_distributed());
    }
}
