//! User, ranking and ledger DTOs.

use serde::Serialize;

use crate::domain::scoring::{PointLog, tier_for};
use crate::domain::shared::Timestamp;
use crate::domain::user::User;

/// User as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    /// User ID.
    pub id: String,
    /// Display name.
    pub nickname: String,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Points.
    pub points: u64,
    /// Tier name.
    pub tier: String,
    /// Tier badge.
    pub tier_image: &'static str,
    /// Registration time.
    pub created_at: Timestamp,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            nickname: user.nickname().to_string(),
            email: user.email().map(str::to_string),
            avatar_url: user.avatar_url().map(str::to_string),
            points: user.points(),
            tier: user.tier().to_string(),
            tier_image: tier_for(user.points()).image,
            created_at: user.created_at(),
        }
    }
}

/// One row of the points ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntryDto {
    /// 1-based rank.
    pub rank: usize,
    /// User ID.
    pub user_id: String,
    /// Display name.
    pub nickname: String,
    /// Points.
    pub points: u64,
    /// Tier name.
    pub tier: String,
}

/// A top voter of a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopVoterDto {
    /// Display name.
    pub nickname: String,
    /// Points.
    pub points: u64,
    /// Tier name.
    pub tier: String,
}

/// Ledger entry as returned by the API.
pub type PointLogDto = PointLog;
