//! Couple predictions for one episode of a match mission.

use serde::{Deserialize, Serialize};

use super::errors::PickError;
use crate::domain::mission::MatchPair;
use crate::domain::shared::{MissionId, PickId, Timestamp, UserId};

/// A viewer's couples for one episode. One per (user, mission, episode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPick {
    id: PickId,
    mission_id: MissionId,
    user_id: UserId,
    episode_no: u32,
    pairs: Vec<MatchPair>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl MatchPick {
    /// Create a match pick. Pairs are trimmed and deduplicated.
    pub fn new(
        mission_id: MissionId,
        user_id: UserId,
        episode_no: u32,
        pairs: Vec<MatchPair>,
        now: Timestamp,
    ) -> Result<Self, PickError> {
        if episode_no == 0 {
            return Err(PickError::InvalidParameters {
                field: "episode_no".to_string(),
                message: "Episode numbers start at 1".to_string(),
            });
        }
        if pairs.is_empty() {
            return Err(PickError::InvalidParameters {
                field: "pairs".to_string(),
                message: "At least one couple is required".to_string(),
            });
        }

        let mut sanitized = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let clean = pair.sanitized().ok_or_else(|| PickError::InvalidParameters {
                field: "pairs".to_string(),
                message: "Both names of a couple are required".to_string(),
            })?;
            if !sanitized.contains(&clean) {
                sanitized.push(clean);
            }
        }

        Ok(Self {
            id: PickId::generate(),
            mission_id,
            user_id,
            episode_no,
            pairs: sanitized,
            created_at: now,
            updated_at: now,
        })
    }

    /// Pick ID.
    #[must_use]
    pub const fn id(&self) -> &PickId {
        &self.id
    }

    /// Mission.
    #[must_use]
    pub const fn mission_id(&self) -> &MissionId {
        &self.mission_id
    }

    /// Voter.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Episode the couples are predicted for.
    #[must_use]
    pub const fn episode_no(&self) -> u32 {
        self.episode_no
    }

    /// Predicted couples.
    #[must_use]
    pub fn pairs(&self) -> &[MatchPair] {
        &self.pairs
    }

    /// First submission time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Whether every couple of `final_answer` is among the predictions.
    #[must_use]
    pub fn covers(&self, final_answer: &[MatchPair]) -> bool {
        !final_answer.is_empty() && final_answer.iter().all(|p| self.pairs.contains(p))
    }

    /// Merge a resubmission into the stored pick, keeping its identity.
    #[must_use]
    pub fn replaced_by(&self, newer: Self) -> Self {
        Self {
            id: self.id.clone(),
            created_at: self.created_at,
            ..newer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[(&str, &str)]) -> Vec<MatchPair> {
        values.iter().map(|(l, r)| MatchPair::new(*l, *r)).collect()
    }

    #[test]
    fn rejects_episode_zero_and_empty_pairs() {
        let now = Timestamp::now();
        assert!(MatchPick::new(MissionId::new("m"), UserId::new("u"), 0, pairs(&[("a", "b")]), now).is_err());
        assert!(MatchPick::new(MissionId::new("m"), UserId::new("u"), 1, Vec::new(), now).is_err());
        assert!(MatchPick::new(MissionId::new("m"), UserId::new("u"), 1, pairs(&[("a", " ")]), now).is_err());
    }

    #[test]
    fn dedupes_trimmed_pairs() {
        let pick = MatchPick::new(
            MissionId::new("m"),
            UserId::new("u"),
            1,
            pairs(&[("영수", "옥순"), (" 영수", "옥순 ")]),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(pick.pairs().len(), 1);
    }

    #[test]
    fn covers_requires_every_final_pair() {
        let pick = MatchPick::new(
            MissionId::new("m"),
            UserId::new("u"),
            1,
            pairs(&[("영수", "옥순"), ("영호", "영숙")]),
            Timestamp::now(),
        )
        .unwrap();
        assert!(pick.covers(&pairs(&[("영수", "옥순")])));
        assert!(pick.covers(&pairs(&[("영수", "옥순"), ("영호", "영숙")])));
        assert!(!pick.covers(&pairs(&[("영수", "옥순"), ("광수", "정숙")])));
        assert!(!pick.covers(&[]));
    }
}
