//! Pick errors.

use std::fmt;

/// Errors that can occur when submitting a pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// Invalid pick parameters.
    InvalidParameters {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },

    /// The mission no longer accepts picks.
    MissionClosed {
        /// Mission ID.
        mission_id: String,
    },

    /// The episode is not open for match picks.
    EpisodeNotOpen {
        /// Episode number.
        episode_no: u32,
    },

    /// Selected option is not one of the mission's options.
    UnknownOption {
        /// Submitted option.
        option: String,
    },

    /// Pick shape does not match the mission form.
    WrongForm {
        /// Mission ID.
        mission_id: String,
        /// Expected pick shape.
        expected: String,
    },
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters { field, message } => {
                write!(f, "Invalid pick parameter '{field}': {message}")
            }
            Self::MissionClosed { mission_id } => {
                write!(f, "Mission {mission_id} is closed")
            }
            Self::EpisodeNotOpen { episode_no } => {
                write!(f, "Episode {episode_no} is not open")
            }
            Self::UnknownOption { option } => write!(f, "Unknown option: {option}"),
            Self::WrongForm {
                mission_id,
                expected,
            } => write!(f, "Mission {mission_id} expects a {expected}"),
        }
    }
}

impl std::error::Error for PickError {}
