//! Per-option vote tally.

use serde::Serialize;

/// Vote counts for the options of a mission.
///
/// Every option starts at zero. Votes for values outside the option list are
/// counted in the total but not in any option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionTally {
    counts: Vec<(String, u64)>,
    total_votes: u64,
}

impl OptionTally {
    /// Tally `votes` against `options`.
    pub fn compute<S: AsRef<str>>(options: &[String], votes: impl IntoIterator<Item = S>) -> Self {
        let mut counts: Vec<(String, u64)> = options.iter().map(|o| (o.clone(), 0)).collect();
        let mut total_votes = 0;
        for vote in votes {
            total_votes += 1;
            if let Some((_, count)) = counts.iter_mut().find(|(o, _)| o == vote.as_ref()) {
                *count += 1;
            }
        }
        Self {
            counts,
            total_votes,
        }
    }

    /// Number of votes cast.
    #[must_use]
    pub const fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// Counts in option order.
    #[must_use]
    pub fn counts(&self) -> &[(String, u64)] {
        &self.counts
    }

    /// Count for one option.
    #[must_use]
    pub fn count(&self, option: &str) -> u64 {
        self.counts
            .iter()
            .find(|(o, _)| o == option)
            .map_or(0, |(_, c)| *c)
    }

    /// Rounded share of the total per option, in option order.
    #[must_use]
    pub fn percentages(&self) -> Vec<(String, u32)> {
        self.counts
            .iter()
            .map(|(option, count)| (option.clone(), percentage(*count, self.total_votes)))
            .collect()
    }

    /// Option with the strictly highest count; the earliest option wins ties.
    ///
    /// `None` when nobody voted for a listed option.
    #[must_use]
    pub fn majority(&self) -> Option<&str> {
        if self.total_votes == 0 {
            return None;
        }
        let mut best: Option<(&str, u64)> = None;
        for (option, count) in &self.counts {
            if *count > best.map_or(0, |(_, c)| c) {
                best = Some((option.as_str(), *count));
            }
        }
        best.map(|(option, _)| option)
    }
}

/// `round(count / total * 100)`, zero when there are no votes.
#[must_use]
pub fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}
