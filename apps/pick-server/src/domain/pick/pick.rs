//! Picks on binary, multi and subjective missions.

use serde::{Deserialize, Serialize};

use super::errors::PickError;
use crate::domain::shared::{MissionId, PickId, Timestamp, UserId};

/// Longest accepted answer for subjective missions.
pub const MAX_ANSWER_CHARS: usize = 500;

/// A viewer's answer to a mission. One per (user, mission).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    id: PickId,
    mission_id: MissionId,
    user_id: UserId,
    selected_option: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Pick {
    /// Create a pick with a trimmed, non-blank answer.
    pub fn new(
        mission_id: MissionId,
        user_id: UserId,
        selected_option: &str,
        now: Timestamp,
    ) -> Result<Self, PickError> {
        let selected_option = selected_option.trim();
        if selected_option.is_empty() {
            return Err(PickError::InvalidParameters {
                field: "selected_option".to_string(),
                message: "Answer must not be blank".to_string(),
            });
        }
        if selected_option.chars().count() > MAX_ANSWER_CHARS {
            return Err(PickError::InvalidParameters {
                field: "selected_option".to_string(),
                message: format!("Answer exceeds {MAX_ANSWER_CHARS} characters"),
            });
        }
        Ok(Self {
            id: PickId::generate(),
            mission_id,
            user_id,
            selected_option: selected_option.to_string(),
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

    /// Chosen option or free-text answer.
    #[must_use]
    pub fn selected_option(&self) -> &str {
        &self.selected_option
    }

    /// First submission time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Latest submission time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
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

    #[test]
    fn trims_answer() {
        let pick = Pick::new(MissionId::new("m"), UserId::new("u"), " 예 ", Timestamp::now())
            .unwrap();
        assert_eq!(pick.selected_option(), "예");
    }

    #[test]
    fn rejects_blank_and_oversized_answers() {
        assert!(Pick::new(MissionId::new("m"), UserId::new("u"), "   ", Timestamp::now()).is_err());
        let long = "가".repeat(MAX_ANSWER_CHARS + 1);
        assert!(Pick::new(MissionId::new("m"), UserId::new("u"), &long, Timestamp::now()).is_err());
    }

    #[test]
    fn replacement_keeps_identity() {
        let first = Pick::new(MissionId::new("m"), UserId::new("u"), "예", Timestamp::now())
            .unwrap();
        let second = Pick::new(MissionId::new("m"), UserId::new("u"), "아니오", Timestamp::now())
            .unwrap();
        let merged = first.replaced_by(second);
        assert_eq!(merged.id(), first.id());
        assert_eq!(merged.selected_option(), "아니오");
    }
}
