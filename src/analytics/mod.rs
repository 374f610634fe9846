/// Analytics engine for derived habit views
///
/// This module turns stored habits, logs and books into the numbers the user
/// sees: per-habit streaks, the dashboard cards and the yearly activity
/// calendar. Everything here is computed from snapshots handed in by the
/// caller; nothing is cached or written back.

use serde::Serialize;

use crate::domain::{
    build_activity_grid, compute_streaks, days_for_habit, ActivityGrid, ActivityStats, Book,
    BookStatus, DayKey, DomainError, Habit, HabitLog, HabitWithStats, ReferenceZone,
};

/// The four dashboard cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Habits with a log for today
    pub completed_today: u32,
    pub total_habits: u32,
    /// Highest current streak across all habits
    pub best_current_streak: u32,
    /// Books with status `reading`
    pub reading_books: u32,
}

/// A full calendar year of activity plus summary stats
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub year: i32,
    #[serde(flatten)]
    pub grid: ActivityGrid,
    pub stats: ActivityStats,
}

/// Analytics engine for processing habit data
///
/// Holds the reference timezone so every view agrees on what "today" is.
pub struct AnalyticsEngine {
    zone: ReferenceZone,
}

impl AnalyticsEngine {
    pub fn new(zone: ReferenceZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> ReferenceZone {
        self.zone
    }

    /// Today's day key in the reference timezone
    pub fn today(&self) -> DayKey {
        self.zone.today()
    }

    /// Attach streaks and today's completion to every habit
    ///
    /// `logs` may contain logs of any of the user's habits; each habit only
    /// sees its own.
    pub fn habits_with_stats(
        &self,
        habits: Vec<Habit>,
        logs: &[HabitLog],
        today: DayKey,
    ) -> Vec<HabitWithStats> {
        habits
            .into_iter()
            .map(|habit| {
                let streaks = compute_streaks(days_for_habit(logs, &habit.id), today);
                let completed_today = days_for_habit(logs, &habit.id).any(|day| day == today);

                HabitWithStats {
                    habit,
                    current_streak: streaks.current,
                    longest_streak: streaks.longest,
                    completed_today,
                }
            })
            .collect()
    }

    /// Summarize habits and books into the dashboard cards
    pub fn dashboard(&self, habits: &[HabitWithStats], books: &[Book]) -> DashboardSummary {
        DashboardSummary {
            completed_today: habits.iter().filter(|h| h.completed_today).count() as u32,
            total_habits: habits.len() as u32,
            best_current_streak: habits.iter().map(|h| h.current_streak).max().unwrap_or(0),
            reading_books: books
                .iter()
                .filter(|b| b.status == BookStatus::Reading)
                .count() as u32,
        }
    }

    /// Build the January-to-December heatmap for `year`
    ///
    /// Logs outside `year` are ignored, for the grid and the stats alike.
    pub fn calendar(
        &self,
        habit_count: usize,
        logs: &[HabitLog],
        year: i32,
        today: DayKey,
    ) -> Result<CalendarView, DomainError> {
        let start = DayKey::from_ymd(year, 1, 1)?;
        let end = DayKey::from_ymd(year, 12, 31)?;
        let grid = build_activity_grid(logs, habit_count, start, end)?;
        let in_year: Vec<HabitLog> = logs
            .iter()
            .filter(|log| log.completed_at >= start && log.completed_at <= end)
            .cloned()
            .collect();

        tracing::debug!(
            "Built activity calendar for {} with {} weeks",
            year,
            grid.weeks.len()
        );

        Ok(CalendarView {
            year,
            grid,
            stats: ActivityStats::from_logs(&in_year, today),
        })
    }

    /// Number of distinct days a habit was completed within `start..=end`
    pub fn completions_between(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        start: DayKey,
        end: DayKey,
    ) -> u32 {
        let mut days: Vec<DayKey> = days_for_habit(logs, &habit.id)
            .filter(|day| *day >= start && *day <= end)
            .collect();
        days.sort();
        days.dedup();
        days.len() as u32
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(ReferenceZone::utc())
    }
}
