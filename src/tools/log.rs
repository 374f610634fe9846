/// Tool for toggling habit completions
///
/// This module implements the habit_toggle MCP tool: a day that is logged
/// becomes unlogged and vice versa.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{compute_streaks, days_for_habit, DayKey};
use crate::storage::HabitFlowStore;
use crate::tools::{parse_habit_id, ToolContext, ToolError};

/// Parameters for toggling a habit completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit
    pub habit_id: String,
    /// Day to toggle as YYYY-MM-DD or an RFC 3339 timestamp (defaults to today)
    pub date: Option<String>,
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    /// Whether the day is logged after the toggle
    pub completed: bool,
    pub date: DayKey,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

/// Flip the completion state of a habit on one day
///
/// Reads the current state, then deletes or inserts. There is no
/// transaction around the two steps; concurrent toggles of the same day can
/// race, and the unique (habit, day) index keeps duplicates out.
pub fn toggle_habit<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: ToggleHabitParams,
) -> Result<ToggleHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = ctx.storage.get_habit(ctx.user, &habit_id)?;

    let today = ctx.analytics.today();
    let day = match params.date.as_deref() {
        Some(raw) => ctx.analytics.zone().parse_day(raw)?,
        None => today,
    };

    let completed = match ctx.storage.find_log(&habit_id, day)? {
        Some(existing) => {
            ctx.storage.delete_log(&existing.id)?;
            false
        }
        None => {
            ctx.storage.upsert_log(&habit_id, day)?;
            true
        }
    };

    let logs = ctx.storage.list_logs(ctx.user)?;
    let streaks = compute_streaks(days_for_habit(&logs, &habit_id), today);

    tracing::debug!(
        "Toggled habit {} on {}: completed={}",
        habit_id,
        day,
        completed
    );

    let message = if completed {
        format!(
            "🔥 Logged '{}' for {}! {}",
            habit.name,
            day,
            streaks.motivational_message()
        )
    } else {
        format!(
            "↩️ Unlogged '{}' for {}. Current streak: {} day{}",
            habit.name,
            day,
            streaks.current,
            if streaks.current == 1 { "" } else { "s" }
        )
    };

    Ok(ToggleHabitResponse {
        completed,
        date: day,
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        message,
    })
}
