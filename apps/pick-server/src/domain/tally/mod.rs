//! Result tallies for option and match missions.

pub mod match_tally;
pub mod option_tally;

pub use match_tally::{EpisodeFilter, MatchTally};
pub use option_tally::{OptionTally, percentage};
