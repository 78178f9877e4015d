//! Couple-prediction tally for match missions.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::domain::pick::MatchPick;

/// Which episodes a match tally covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EpisodeFilter {
    /// Every episode.
    #[default]
    All,
    /// One episode.
    Single(u32),
    /// A set of episodes.
    Many(Vec<u32>),
}

impl EpisodeFilter {
    fn includes(&self, episode_no: u32) -> bool {
        match self {
            Self::All => true,
            Self::Single(ep) => *ep == episode_no,
            Self::Many(eps) => eps.contains(&episode_no),
        }
    }
}

/// How often each couple was predicted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MatchTally {
    /// Counts keyed `"{left}-{right}"`.
    pub pair_counts: BTreeMap<String, u64>,
    /// Distinct users among the counted picks.
    pub total_participants: u64,
    /// Picks counted.
    pub total_votes: u64,
}

impl MatchTally {
    /// Tally the picks that fall inside `filter`.
    #[must_use]
    pub fn compute(picks: &[MatchPick], filter: &EpisodeFilter) -> Self {
        let mut tally = Self::default();
        let mut users = HashSet::new();
        for pick in picks.iter().filter(|p| filter.includes(p.episode_no())) {
            users.insert(pick.user_id().clone());
            tally.total_votes += 1;
            for pair in pick.pairs() {
                *tally.pair_counts.entry(pair.key()).or_default() += 1;
            }
        }
        tally.total_participants = users.len() as u64;
        tally
    }
}
