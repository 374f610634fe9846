/// Core types and enums used throughout the domain layer
///
/// This module defines the ID types, the owning user, a habit's target
/// weekdays and a book's reading status.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Declares a UUID-backed identifier type.
///
/// Each record kind gets its own wrapper so a habit ID can't be passed where
/// a book ID is expected.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier from its string form (database rows, tool arguments)
            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s.trim())?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a habit
    HabitId
);

uuid_id!(
    /// Unique identifier for a habit completion log
    LogId
);

uuid_id!(
    /// Unique identifier for a book
    BookId
);

uuid_id!(
    /// Unique identifier for a generated weekly digest
    DigestId
);

/// Identifier of the user that owns a record
///
/// Accounts live in the backend; to us the ID is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "User ID cannot be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weekdays a habit is expected on, as numbers 1 (Monday) through 7 (Sunday)
///
/// Always holds at least one day. Serialized as a sorted array of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct TargetDays(BTreeSet<u8>);

impl TargetDays {
    /// Build a target set, rejecting empty input and numbers outside 1..=7
    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self, DomainError> {
        let mut set = BTreeSet::new();
        for day in days {
            if !(1..=7).contains(&day) {
                return Err(DomainError::InvalidTargetDays(format!(
                    "Weekday numbers must be 1-7 (1 = Monday), got {}",
                    day
                )));
            }
            set.insert(day);
        }

        if set.is_empty() {
            return Err(DomainError::InvalidTargetDays(
                "At least one target day is required".to_string(),
            ));
        }

        Ok(Self(set))
    }

    /// Every day of the week (the default for new habits)
    pub fn every_day() -> Self {
        Self((1..=7).collect())
    }

    /// Check whether a weekday is one of the targets
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0.contains(&(weekday.number_from_monday() as u8))
    }

    /// Check whether a date falls on a target weekday
    pub fn is_target_date(&self, date: chrono::NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TargetDays {
    fn default() -> Self {
        Self::every_day()
    }
}

impl TryFrom<Vec<u8>> for TargetDays {
    type Error = DomainError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<TargetDays> for Vec<u8> {
    fn from(days: TargetDays) -> Self {
        days.0.into_iter().collect()
    }
}

/// Reading status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// Currently being read
    Reading,
    /// Finished
    Completed,
    /// Started but put aside
    Paused,
    /// On the reading list, not started
    WantToRead,
}

impl BookStatus {
    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Reading => "reading",
            BookStatus::Completed => "completed",
            BookStatus::Paused => "paused",
            BookStatus::WantToRead => "want_to_read",
        }
    }

    /// Parse a status, accepting the storage form case-insensitively
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "reading" => Ok(BookStatus::Reading),
            "completed" => Ok(BookStatus::Completed),
            "paused" => Ok(BookStatus::Paused),
            "want_to_read" => Ok(BookStatus::WantToRead),
            other => Err(DomainError::InvalidValue {
                message: format!(
                    "Invalid book status '{}'. Valid options: reading, completed, paused, want_to_read",
                    other
                ),
            }),
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            BookStatus::Reading => "Reading",
            BookStatus::Completed => "Completed",
            BookStatus::Paused => "Paused",
            BookStatus::WantToRead => "Want to read",
        }
    }
}

impl Default for BookStatus {
    fn default() -> Self {
        BookStatus::WantToRead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_target_days_dedupes_and_sorts() {
        let days = TargetDays::new(vec![5, 1, 3, 1]).unwrap();
        assert_eq!(days.days().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn test_target_days_rejects_out_of_range() {
        assert!(TargetDays::new(vec![0]).is_err());
        assert!(TargetDays::new(vec![8]).is_err());
        assert!(TargetDays::new(Vec::new()).is_err());
    }

    #[test]
    fn test_target_days_weekday_lookup() {
        let weekdays = TargetDays::new(1..=5).unwrap();
        // 2024-01-06 was a Saturday, 2024-01-08 a Monday
        assert!(!weekdays.is_target_date(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
        assert!(weekdays.is_target_date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
        assert!(TargetDays::every_day().contains(Weekday::Sun));
    }

    #[test]
    fn test_target_days_serde() {
        let json = serde_json::to_string(&TargetDays::new(vec![7, 6]).unwrap()).unwrap();
        assert_eq!(json, "[6,7]");
        assert!(serde_json::from_str::<TargetDays>("[9]").is_err());
    }

    #[test]
    fn test_book_status_round_trip_names() {
        assert_eq!(BookStatus::parse("Want_To_Read").unwrap(), BookStatus::WantToRead);
        assert_eq!(BookStatus::Paused.as_str(), "paused");
        assert!(BookStatus::parse("abandoned").is_err());
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("  ").is_err());
        assert_eq!(UserId::new(" alice ").unwrap().as_str(), "alice");
    }
}
