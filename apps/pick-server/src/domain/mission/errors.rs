//! Mission errors.

use std::fmt;

use super::value_objects::MissionStatus;

/// Errors that can occur while creating or resolving a mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionError {
    /// Invalid mission parameters.
    InvalidParameters {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },

    /// Only the mission creator may perform this action.
    NotCreator {
        /// Mission ID.
        mission_id: String,
    },

    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Current status.
        from: MissionStatus,
        /// Attempted status.
        to: MissionStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Operation does not apply to this kind or form of mission.
    Unsupported {
        /// Mission ID.
        mission_id: String,
        /// Operation attempted.
        operation: String,
    },

    /// Episode number outside `1..=total_episodes`.
    EpisodeOutOfRange {
        /// Requested episode.
        episode: u32,
        /// Episodes in the mission.
        total: u32,
    },

    /// Mission not found.
    NotFound {
        /// Mission ID.
        mission_id: String,
    },
}

impl fmt::Display for MissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters { field, message } => {
                write!(f, "Invalid mission parameter '{field}': {message}")
            }
            Self::NotCreator { mission_id } => {
                write!(f, "Only the creator can resolve mission {mission_id}")
            }
            Self::InvalidStateTransition { from, to, reason } => {
                write!(f, "Invalid mission state transition: {from} -> {to}: {reason}")
            }
            Self::Unsupported {
                mission_id,
                operation,
            } => write!(f, "Mission {mission_id} does not support {operation}"),
            Self::EpisodeOutOfRange { episode, total } => {
                write!(f, "Episode {episode} is outside 1..={total}")
            }
            Self::NotFound { mission_id } => write!(f, "Mission not found: {mission_id}"),
        }
    }
}

impl std::error::Error for MissionError {}
