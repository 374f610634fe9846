/// Activity heatmap aggregation
///
/// Buckets completions from all habits by calendar day and lays the days out
/// as a week-by-weekday grid for calendar rendering.

use std::collections::{BTreeSet, HashMap};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::domain::{compute_streaks, DayKey, DomainError, HabitLog};

/// First column of every grid row
pub const WEEK_START: Weekday = Weekday::Sun;

/// Completion density for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: DayKey,
    pub completed_count: u32,
    pub total_count: u32,
    /// `completed_count / total_count * 100`, capped at 100
    pub percentage: f64,
}

impl DayActivity {
    pub fn level(&self) -> ActivityLevel {
        ActivityLevel::from_percentage(self.percentage)
    }
}

/// One grid row, `WEEK_START` first; `None` marks days outside the range
pub type ActivityWeek = [Option<DayActivity>; 7];

/// Week-by-weekday matrix of day activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityGrid {
    pub weeks: Vec<ActivityWeek>,
}

impl ActivityGrid {
    /// In-range days, in calendar order
    pub fn days(&self) -> impl Iterator<Item = &DayActivity> {
        self.weeks.iter().flat_map(|week| week.iter().flatten())
    }

    /// Look up a single in-range day
    pub fn day(&self, date: DayKey) -> Option<&DayActivity> {
        self.days().find(|activity| activity.date == date)
    }
}

/// Build the heatmap grid for an inclusive day range
///
/// Logs outside the range are ignored. Every day inside the range gets a
/// `DayActivity`, even with zero completions; the padding that completes the
/// first and last rows is `None`.
pub fn build_activity_grid(
    logs: &[HabitLog],
    habit_count: usize,
    range_start: DayKey,
    range_end: DayKey,
) -> Result<ActivityGrid, DomainError> {
    if range_start > range_end {
        return Err(DomainError::InvalidDate(format!(
            "Range start {} is after range end {}",
            range_start, range_end
        )));
    }

    let mut completions_by_day: HashMap<DayKey, u32> = HashMap::new();
    for log in logs {
        if log.completed_at >= range_start && log.completed_at <= range_end {
            *completions_by_day.entry(log.completed_at).or_insert(0) += 1;
        }
    }

    // Avoid dividing by zero for users without habits
    let total_count = habit_count.max(1) as u32;

    let display_start = range_start.add_days(-days_from_week_start(range_start));
    let display_end = range_end.add_days(6 - days_from_week_start(range_end));

    let mut weeks = Vec::new();
    let mut cursor = display_start;
    while cursor <= display_end {
        let week: ActivityWeek = std::array::from_fn(|offset| {
            let date = cursor.add_days(offset as i64);
            if date < range_start || date > range_end {
                return None;
            }

            let completed_count = completions_by_day.get(&date).copied().unwrap_or(0);
            let percentage = (f64::from(completed_count) / f64::from(total_count) * 100.0).min(100.0);

            Some(DayActivity {
                date,
                completed_count,
                total_count,
                percentage,
            })
        });

        weeks.push(week);
        cursor = cursor.add_days(7);
    }

    Ok(ActivityGrid { weeks })
}

fn days_from_week_start(day: DayKey) -> i64 {
    let weekday = day.weekday().num_days_from_sunday() as i64;
    let start = WEEK_START.num_days_from_sunday() as i64;
    (weekday - start).rem_euclid(7)
}

/// Heatmap shade bucket, 0 (nothing done) through 4 (most)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityLevel(pub u8);

impl ActivityLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        let level = if percentage <= 0.0 {
            0
        } else if percentage < 25.0 {
            1
        } else if percentage < 50.0 {
            2
        } else if percentage < 75.0 {
            3
        } else {
            4
        };
        Self(level)
    }

    /// Single-character cell for plain-text heatmaps
    pub fn glyph(&self) -> char {
        match self.0 {
            0 => '·',
            1 => '░',
            2 => '▒',
            3 => '▓',
            _ => '█',
        }
    }
}

/// Summary numbers shown next to the heatmap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Number of logs, across all habits
    pub total_completions: u32,
    /// Distinct days with at least one completion
    pub active_days: u32,
    /// Streak of days with any completion, ending today or yesterday
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl ActivityStats {
    pub fn from_logs(logs: &[HabitLog], today: DayKey) -> Self {
        let active: BTreeSet<DayKey> = logs.iter().map(|log| log.completed_at).collect();
        let streaks = compute_streaks(active.iter().copied(), today);

        Self {
            total_completions: logs.len() as u32,
            active_days: active.len() as u32,
            current_streak: streaks.current,
            longest_streak: streaks.longest,
        }
    }
}
