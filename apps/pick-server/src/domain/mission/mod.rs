//! Mission Bounded Context
//!
//! Missions are questions about a show. Binary, multi and subjective
//! missions take one pick per viewer; match missions take couple
//! predictions per episode.

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod value_objects;

pub use aggregate::{
    CreateMissionCommand, DEFAULT_TOTAL_EPISODES, Mission, ReconstitutedMissionParams,
};
pub use errors::MissionError;
pub use events::{EpisodeStatusChanged, MissionCreated, MissionEvent, MissionSettled};
pub use repository::{MissionFilter, MissionRepository, SAVE_ATTEMPTS, update_mission};
pub use value_objects::{
    BroadcastSchedule, EpisodeStatus, MatchCandidates, MatchPair, MissionForm, MissionKind,
    MissionStats, MissionStatus, RevealPolicy, SeasonType,
};
