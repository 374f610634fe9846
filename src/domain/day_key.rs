/// Day-key normalization
///
/// Every streak and heatmap comparison works on calendar days, never on raw
/// timestamps. A `DayKey` is one calendar day in the deployment's reference
/// timezone; `ReferenceZone` turns instants into keys.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` identifier for a calendar day
///
/// Keys are values: stepping to a neighbouring day returns a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a key from year/month/day, failing on impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DomainError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                DomainError::InvalidDate(format!("{:04}-{:02}-{:02} is not a calendar day", year, month, day))
            })
    }

    /// Parse a strict `YYYY-MM-DD` string
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(format!("Expected YYYY-MM-DD, got '{}'", trimmed)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn previous(&self) -> Self {
        self.add_days(-1)
    }

    pub fn next(&self) -> Self {
        self.add_days(1)
    }

    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Whole days from `earlier` to `self` (negative if `earlier` is later)
    pub fn days_since(&self, earlier: DayKey) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DayKey {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// The fixed timezone in which calendar days are decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone(Tz);

impl ReferenceZone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Look up a zone by IANA name (e.g. `Europe/Berlin`)
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        name.trim()
            .parse::<Tz>()
            .map(Self)
            .map_err(|e| DomainError::InvalidTimezone(format!("'{}': {}", name.trim(), e)))
    }

    pub fn utc() -> Self {
        Self(Tz::UTC)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// The calendar day an instant falls on in this zone
    pub fn day_key(&self, instant: DateTime<Utc>) -> DayKey {
        DayKey(instant.with_timezone(&self.0).date_naive())
    }

    pub fn today(&self) -> DayKey {
        self.day_key(Utc::now())
    }

    /// Parse user input that is either a day key or an RFC 3339 timestamp
    ///
    /// Timestamps are normalized through `day_key`, so `2024-03-01T23:30:00-08:00`
    /// lands on whichever day that instant is in this zone.
    pub fn parse_day(&self, input: &str) -> Result<DayKey, DomainError> {
        let trimmed = input.trim();
        if let Ok(key) = DayKey::parse(trimmed) {
            return Ok(key);
        }

        DateTime::parse_from_rfc3339(trimmed)
            .map(|instant| self.day_key(instant.with_timezone(&Utc)))
            .map_err(|_| {
                DomainError::InvalidDate(format!(
                    "Expected YYYY-MM-DD or an RFC 3339 timestamp, got '{}'",
                    trimmed
                ))
            })
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::utc()
    }
}
