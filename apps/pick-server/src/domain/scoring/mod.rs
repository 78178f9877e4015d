//! Points, tiers and the point ledger.

pub mod point_log;
pub mod points;
pub mod tier;

pub use point_log::{MissionType, PointLog, PointLogMetadata, apply_diff};
pub use points::{
    episode_score, match_pick_points, match_reason, option_pick_points, option_reason,
};
pub use tier::{TIERS, Tier, lowest_tier, tier_for};
