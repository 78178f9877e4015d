//! Point ledger entries.

use serde::{Deserialize, Serialize};

use crate::domain::mission::MissionForm;
use crate::domain::shared::{MissionId, PointLogId, Timestamp, UserId};

/// Which mission table a ledger entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    /// Binary, multi and subjective missions.
    Mission1,
    /// Match missions.
    Mission2,
}

impl MissionType {
    /// Table a mission of `form` belongs to.
    #[must_use]
    pub const fn for_form(form: MissionForm) -> Self {
        if form.is_match() {
            Self::Mission2
        } else {
            Self::Mission1
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mission1 => "mission1",
            Self::Mission2 => "mission2",
        }
    }
}

/// Extra context on a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointLogMetadata {
    /// Episode a match pick was scored for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_no: Option<u32>,
}

/// One change to a user's points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointLog {
    /// Entry ID.
    pub id: PointLogId,
    /// Whose points changed.
    pub user_id: UserId,
    /// Mission that caused the change.
    pub mission_id: MissionId,
    /// Mission table.
    pub mission_type: MissionType,
    /// Signed change.
    pub diff: i64,
    /// Human-readable reason.
    pub reason: String,
    /// Extra context.
    pub metadata: PointLogMetadata,
    /// When it was recorded.
    pub created_at: Timestamp,
}

impl PointLog {
    /// New ledger entry for a user.
    pub fn new(
        user_id: UserId,
        mission_id: MissionId,
        mission_type: MissionType,
        diff: i64,
        reason: impl Into<String>,
        metadata: PointLogMetadata,
    ) -> Self {
        Self {
            id: PointLogId::generate(),
            user_id,
            mission_id,
            mission_type,
            diff,
            reason: reason.into(),
            metadata,
            created_at: Timestamp::now(),
        }
    }
}

/// Points after applying `diff`; never below zero.
#[must_use]
pub fn apply_diff(points: u64, diff: i64) -> u64 {
    if diff >= 0 {
        points.saturating_add(diff.unsigned_abs())
    } else {
        points.saturating_sub(diff.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_diff_clamps_at_zero() {
        assert_eq!(apply_diff(50, 30), 80);
        assert_eq!(apply_diff(50, -30), 20);
        assert_eq!(apply_diff(50, -100), 0);
    }

    #[test]
    fn metadata_omits_missing_episode() {
        let json = serde_json::to_value(PointLogMetadata::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
