/// Streak calculation
///
/// Streaks are runs of consecutive calendar days with at least one
/// completion. Every habit is treated as daily: `TargetDays` is not
/// consulted here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::DayKey;

/// Current and longest streak for a set of completion days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive days ending today, or yesterday if today isn't done yet
    pub current: u32,
    /// Best run ever seen
    pub longest: u32,
}

impl StreakSummary {
    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", self.current),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", self.current),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", self.current),
            30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", self.current),
            _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", self.current),
        }
    }
}

/// Compute current and longest streaks from completion days
///
/// Duplicate days count once. The current streak is anchored at `today` when
/// today is completed, at yesterday when only yesterday is, and is zero
/// otherwise; from the anchor it counts back to the first missing day.
pub fn compute_streaks<I>(days: I, today: DayKey) -> StreakSummary
where
    I: IntoIterator<Item = DayKey>,
{
    let days: BTreeSet<DayKey> = days.into_iter().collect();

    StreakSummary {
        current: current_streak(&days, today),
        longest: longest_streak(&days),
    }
}

fn current_streak(days: &BTreeSet<DayKey>, today: DayKey) -> u32 {
    let anchor = if days.contains(&today) {
        today
    } else if days.contains(&today.previous()) {
        today.previous()
    } else {
        return 0;
    };

    let mut streak = 0;
    let mut checking = anchor;
    while days.contains(&checking) {
        streak += 1;
        checking = checking.previous();
    }

    streak
}

fn longest_streak(days: &BTreeSet<DayKey>) -> u32 {
    let mut longest = 0;
    let mut running = 0;
    let mut last: Option<DayKey> = None;

    // BTreeSet iterates in ascending order
    for &day in days {
        running = match last {
            Some(previous) if day.days_since(previous) == 1 => running + 1,
            _ => 1,
        };
        longest = longest.max(running);
        last = Some(day);
    }

    longest
}
