//! Pick Repository Trait

use async_trait::async_trait;

use super::match_pick::MatchPick;
use super::pick::Pick;
use crate::domain::shared::{DomainError, MissionId, UserId};

/// Repository for single picks and match picks.
///
/// Upserts are keyed by (user, mission) and (user, mission, episode)
/// respectively; implementations must apply them atomically.
#[async_trait]
pub trait PickRepository: Send + Sync {
    /// Insert or replace the user's pick. Returns `true` on first submission.
    async fn upsert_pick(&self, pick: Pick) -> Result<bool, DomainError>;

    /// The user's pick on a mission.
    async fn find_pick(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
    ) -> Result<Option<Pick>, DomainError>;

    /// Every pick on a mission.
    async fn list_picks(&self, mission_id: &MissionId) -> Result<Vec<Pick>, DomainError>;

    /// Insert or replace the user's match pick for an episode.
    /// Returns `true` on first submission for that episode.
    async fn upsert_match_pick(&self, pick: MatchPick) -> Result<bool, DomainError>;

    /// Every match pick on a mission.
    async fn list_match_picks(&self, mission_id: &MissionId)
    -> Result<Vec<MatchPick>, DomainError>;

    /// Distinct users with a pick or match pick on the mission, in first-seen order.
    async fn participants(&self, mission_id: &MissionId) -> Result<Vec<UserId>, DomainError>;
}
