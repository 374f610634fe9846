/// HabitLog entity for tracking habit completions
///
/// A log says "this habit was done on this day". There is at most one log per
/// habit and day; toggling a day creates or removes that single record.

use serde::{Deserialize, Serialize};

use crate::domain::{DayKey, HabitId, LogId};

/// A record of completing a habit on a specific day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Unique identifier for this log
    pub id: LogId,
    /// Which habit this log is for
    pub habit_id: HabitId,
    /// Which day the habit was completed
    pub completed_at: DayKey,
}

impl HabitLog {
    pub fn new(habit_id: HabitId, completed_at: DayKey) -> Self {
        Self {
            id: LogId::new(),
            habit_id,
            completed_at,
        }
    }

    /// Create a log from existing data (used when loading from database)
    pub fn from_existing(id: LogId, habit_id: HabitId, completed_at: DayKey) -> Self {
        Self {
            id,
            habit_id,
            completed_at,
        }
    }
}

/// Completion days for one habit, in input order
pub fn days_for_habit<'a>(
    logs: &'a [HabitLog],
    habit_id: &'a HabitId,
) -> impl Iterator<Item = DayKey> + 'a {
    logs.iter()
        .filter(move |log| &log.habit_id == habit_id)
        .map(|log| log.completed_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_for_habit_filters_by_id() {
        let run = HabitId::new();
        let read = HabitId::new();
        let day = DayKey::parse("2024-04-01").unwrap();

        let logs = vec![
            HabitLog::new(run.clone(), day),
            HabitLog::new(read.clone(), day),
            HabitLog::new(run.clone(), day.next()),
        ];

        let run_days: Vec<DayKey> = days_for_habit(&logs, &run).collect();
        assert_eq!(run_days, vec![day, day.next()]);
        assert_eq!(days_for_habit(&logs, &read).count(), 1);
    }
}
