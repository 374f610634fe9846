/// Weekly digest entity
///
/// Digests are generated summaries of one ISO week. They are appended and
/// never edited or deleted; only the most recent ones are shown.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DayKey, DigestId, UserId};

/// How many digests the history view returns
pub const DIGEST_HISTORY_LIMIT: u32 = 12;

/// A generated weekly summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDigest {
    pub id: DigestId,
    pub user_id: UserId,
    /// Monday of the summarized week
    pub week_start: DayKey,
    /// Markdown text as returned by the text generator
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl WeeklyDigest {
    pub fn new(user_id: UserId, week_start: DayKey, content: String) -> Self {
        Self {
            id: DigestId::new(),
            user_id,
            week_start,
            content,
            created_at: Utc::now(),
        }
    }

    /// Create a digest from existing data (used when loading from database)
    pub fn from_existing(
        id: DigestId,
        user_id: UserId,
        week_start: DayKey,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            week_start,
            content,
            created_at,
        }
    }
}

/// Monday of the ISO week containing `day`
pub fn week_start_for(day: DayKey) -> DayKey {
    day.add_days(-(day.date().weekday().num_days_from_monday() as i64))
}

/// Sunday of the ISO week containing `day`
pub fn week_end_for(day: DayKey) -> DayKey {
    week_start_for(day).add_days(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    #[test]
    fn test_week_bounds() {
        // Wednesday
        assert_eq!(week_start_for(day("2024-05-15")), day("2024-05-13"));
        assert_eq!(week_end_for(day("2024-05-15")), day("2024-05-19"));
        // Sunday belongs to the week that started the Monday before
        assert_eq!(week_start_for(day("2024-05-19")), day("2024-05-13"));
        // Monday is its own week start
        assert_eq!(week_start_for(day("2024-05-13")), day("2024-05-13"));
        // Across a year boundary
        assert_eq!(week_start_for(day("2025-01-01")), day("2024-12-30"));
    }
}
