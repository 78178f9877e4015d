//! Mission value objects.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::MissionError;

/// How a mission is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionKind {
    /// The creator submits the correct answer after the fact.
    Predict,
    /// The most picked option wins.
    Majority,
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predict => write!(f, "predict"),
            Self::Majority => write!(f, "majority"),
        }
    }
}

/// Shape of the answer a viewer submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionForm {
    /// Two options.
    Binary,
    /// Three to five options.
    Multi,
    /// Couple matching across episodes.
    Match,
    /// Free text.
    Subjective,
}

impl MissionForm {
    /// Match missions are stored and scored separately from option missions.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// Label used in point ledger reasons.
    #[must_use]
    pub const fn reason_label(&self) -> &'static str {
        match self {
            Self::Binary => "이진",
            _ => "다중",
        }
    }
}

impl fmt::Display for MissionForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Multi => write!(f, "multi"),
            Self::Match => write!(f, "match"),
            Self::Subjective => write!(f, "subjective"),
        }
    }
}

/// When results become visible to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealPolicy {
    /// Results are visible while voting is open.
    #[default]
    Realtime,
    /// Results are hidden until the mission closes.
    OnClose,
}

/// Lifecycle status of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    /// Accepting picks.
    Open,
    /// Deadline passed, awaiting settlement.
    Closed,
    /// Answer known and points distributed.
    Settled,
}

impl MissionStatus {
    /// Settled is the only terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Settled => write!(f, "settled"),
        }
    }
}

/// Which seasons of a show a mission covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeasonType {
    /// Every season.
    #[default]
    #[serde(rename = "전체")]
    All,
    /// One numbered season.
    #[serde(rename = "기수별")]
    PerSeason,
}

/// Status of one episode of a match mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeStatus {
    /// Accepting match picks.
    Open,
    /// Picks frozen, not yet scored.
    Locked,
    /// Scored.
    Settled,
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Locked => write!(f, "locked"),
            Self::Settled => write!(f, "settled"),
        }
    }
}

/// A predicted couple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchPair {
    /// Participant from the left column.
    pub left: String,
    /// Participant from the right column.
    pub right: String,
}

impl MatchPair {
    /// Build a pair from two names.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Trimmed copy, or `None` when either side is blank.
    #[must_use]
    pub fn sanitized(&self) -> Option<Self> {
        let left = self.left.trim();
        let right = self.right.trim();
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some(Self::new(left, right))
    }

    /// Key used for pair tallies (`"{left}-{right}"`).
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.left, self.right)
    }
}

/// Participants a match mission lets viewers pair up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchCandidates {
    /// Left column (e.g. the men).
    pub left: Vec<String>,
    /// Right column (e.g. the women).
    pub right: Vec<String>,
}

impl MatchCandidates {
    /// Whether a pair only uses listed participants.
    #[must_use]
    pub fn contains(&self, pair: &MatchPair) -> bool {
        self.left.iter().any(|l| l == &pair.left) && self.right.iter().any(|r| r == &pair.right)
    }
}

/// Weekly broadcast slot of a match mission, in Korean time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSchedule {
    day: Weekday,
    time: NaiveTime,
}

const DAY_LABELS: [(&str, Weekday); 7] = [
    ("일", Weekday::Sun),
    ("월", Weekday::Mon),
    ("화", Weekday::Tue),
    ("수", Weekday::Wed),
    ("목", Weekday::Thu),
    ("금", Weekday::Fri),
    ("토", Weekday::Sat),
];

impl BroadcastSchedule {
    /// Create a schedule.
    #[must_use]
    pub const fn new(day: Weekday, time: NaiveTime) -> Self {
        Self { day, time }
    }

    /// Parse a Korean day label (`일`..`토`) and an `HH:MM` time.
    pub fn parse(day: &str, time: &str) -> Result<Self, MissionError> {
        let day = DAY_LABELS
            .iter()
            .find(|(label, _)| *label == day.trim())
            .map(|(_, d)| *d)
            .ok_or_else(|| MissionError::InvalidParameters {
                field: "broadcast_day".to_string(),
                message: format!("Unknown broadcast day: {day}"),
            })?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| {
            MissionError::InvalidParameters {
                field: "broadcast_time".to_string(),
                message: format!("Expected HH:MM, got {time}"),
            }
        })?;
        Ok(Self { day, time })
    }

    /// Weekday of the broadcast.
    #[must_use]
    pub const fn day(&self) -> Weekday {
        self.day
    }

    /// Start time of the broadcast (KST).
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// Korean day label.
    #[must_use]
    pub fn day_label(&self) -> &'static str {
        DAY_LABELS
            .iter()
            .find(|(_, d)| *d == self.day)
            .map_or("일", |(label, _)| label)
    }

    /// `HH:MM` time label.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Participation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissionStats {
    /// Distinct users who picked.
    pub participants: u64,
    /// Picks counted in the latest tally.
    pub total_votes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_policy_serializes_camel_case() {
        let json = serde_json::to_string(&RevealPolicy::OnClose).unwrap();
        assert_eq!(json, "\"onClose\"");
    }

    #[test]
    fn season_type_uses_korean_labels() {
        let parsed: SeasonType = serde_json::from_str("\"기수별\"").unwrap();
        assert_eq!(parsed, SeasonType::PerSeason);
    }

    #[test]
    fn pair_sanitize_trims_and_rejects_blanks() {
        let pair = MatchPair::new(" 영수 ", "영숙 ");
        assert_eq!(pair.sanitized(), Some(MatchPair::new("영수", "영숙")));
        assert_eq!(MatchPair::new("영수", "  ").sanitized(), None);
    }

    #[test]
    fn pair_key_joins_with_dash() {
        assert_eq!(MatchPair::new("영수", "옥순").key(), "영수-옥순");
    }

    #[test]
    fn broadcast_schedule_parses_korean_day() {
        let schedule = BroadcastSchedule::parse("수", "22:30").unwrap();
        assert_eq!(schedule.day(), Weekday::Wed);
        assert_eq!(schedule.day_label(), "수");
        assert_eq!(schedule.time_label(), "22:30");
    }

    #[test]
    fn broadcast_schedule_rejects_bad_input() {
        assert!(BroadcastSchedule::parse("Wednesday", "22:30").is_err());
        assert!(BroadcastSchedule::parse("수", "10pm").is_err());
    }

    #[test]
    fn candidates_contains_checks_both_columns() {
        let candidates = MatchCandidates {
            left: vec!["영수".into(), "영호".into()],
            right: vec!["영숙".into()],
        };
        assert!(candidates.contains(&MatchPair::new("영호", "영숙")));
        assert!(!candidates.contains(&MatchPair::new("영숙", "영호")));
    }
}
