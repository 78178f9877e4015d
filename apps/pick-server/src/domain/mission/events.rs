//! Mission domain events.

use serde::{Deserialize, Serialize};

use super::value_objects::{EpisodeStatus, MissionForm, MissionKind};
use crate::domain::shared::{MissionId, Timestamp, UserId};

/// Events emitted by the mission aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MissionEvent {
    /// A mission was published.
    Created(MissionCreated),
    /// A mission reached its terminal state.
    Settled(MissionSettled),
    /// A match episode changed status.
    EpisodeStatusChanged(EpisodeStatusChanged),
}

impl MissionEvent {
    /// Mission the event belongs to.
    #[must_use]
    pub const fn mission_id(&self) -> &MissionId {
        match self {
            Self::Created(e) => &e.mission_id,
            Self::Settled(e) => &e.mission_id,
            Self::EpisodeStatusChanged(e) => &e.mission_id,
        }
    }

    /// Short event name for logs and metrics.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "mission.created",
            Self::Settled(_) => "mission.settled",
            Self::EpisodeStatusChanged(_) => "mission.episode_status_changed",
        }
    }
}

/// A mission was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionCreated {
    /// Mission ID.
    pub mission_id: MissionId,
    /// Creator.
    pub creator_id: UserId,
    /// Kind.
    pub kind: MissionKind,
    /// Form.
    pub form: MissionForm,
    /// When it happened.
    pub occurred_at: Timestamp,
}

/// A mission was settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSettled {
    /// Mission ID.
    pub mission_id: MissionId,
    /// Winning option, when the mission has one.
    pub answer: Option<String>,
    /// When it happened.
    pub occurred_at: Timestamp,
}

/// A match episode changed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStatusChanged {
    /// Mission ID.
    pub mission_id: MissionId,
    /// Episode number.
    pub episode_no: u32,
    /// New status.
    pub status: EpisodeStatus,
    /// When it happened.
    pub occurred_at: Timestamp,
}
