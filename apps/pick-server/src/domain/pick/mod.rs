//! Pick Bounded Context
//!
//! A viewer's answer to a mission.

pub mod errors;
pub mod match_pick;
pub mod pick;
pub mod repository;

pub use errors::PickError;
pub use match_pick::MatchPick;
pub use pick::{MAX_ANSWER_CHARS, Pick};
pub use repository::PickRepository;
