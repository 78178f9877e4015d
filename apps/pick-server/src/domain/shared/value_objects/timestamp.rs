//! Timestamp value object and Korea Standard Time helpers.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset of Korea Standard Time from UTC, in seconds.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// A UTC timestamp for domain events, deadlines and ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp from a DateTime<Utc>.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse from an ISO 8601 string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid ISO 8601 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Get the inner DateTime<Utc>.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Format as ISO 8601 / RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Shift by a signed duration.
    #[must_use]
    pub fn plus(&self, duration: chrono::Duration) -> Self {
        Self(self.0 + duration)
    }

    /// The same instant seen on a Korean wall clock.
    #[must_use]
    pub fn to_kst(&self) -> DateTime<FixedOffset> {
        self.0.with_timezone(&kst())
    }

    /// Day of the week in Korea.
    #[must_use]
    pub fn kst_weekday(&self) -> Weekday {
        self.to_kst().weekday()
    }

    /// Build a UTC timestamp from a Korean calendar date and wall-clock time.
    #[must_use]
    pub fn from_kst(date: NaiveDate, time: NaiveTime) -> Option<Self> {
        kst()
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

/// Korea Standard Time (UTC+9, no daylight saving).
#[must_use]
#[allow(clippy::expect_used)] // Static offset, always within ±24h
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("static KST offset is valid")
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_round_trip() {
        let ts = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-19T12:00:00+00:00");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Timestamp::parse("tomorrow").is_err());
    }

    #[test]
    fn kst_is_nine_hours_ahead() {
        let ts = Timestamp::parse("2026-01-19T20:30:00Z").unwrap();
        let local = ts.to_kst();
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
        assert_eq!(ts.kst_weekday(), Weekday::Tue);
    }

    #[test]
    fn from_kst_converts_to_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let ts = Timestamp::from_kst(date, time).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-04T03:00:00+00:00");
    }

    #[test]
    fn ordering_follows_time() {
        let earlier = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let later = earlier.plus(chrono::Duration::minutes(1));
        assert!(earlier < later);
    }
}
