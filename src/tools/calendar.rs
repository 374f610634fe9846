/// Tool for the yearly activity calendar
///
/// Renders the heatmap as text, one row per weekday and one column per
/// week, next to the overall activity stats.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::CalendarView;
use crate::domain::DayKey;
use crate::storage::HabitFlowStore;
use crate::tools::{ToolContext, ToolError};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarParams {
    /// Calendar year to show (defaults to the current year)
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub calendar: CalendarView,
    pub message: String,
}

pub fn activity_calendar<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: CalendarParams,
) -> Result<CalendarResponse, ToolError> {
    let today = ctx.analytics.today();
    let year = params.year.unwrap_or_else(|| today.year());
    if !(1970..=9999).contains(&year) {
        return Err(ToolError::InvalidParams(format!(
            "Year must be between 1970 and 9999, got {}",
            year
        )));
    }

    let habit_count = ctx.storage.list_habits(ctx.user)?.len();
    let start = DayKey::from_ymd(year, 1, 1)?;
    let end = DayKey::from_ymd(year, 12, 31)?;
    let logs = ctx.storage.list_logs_in_range(ctx.user, start, end)?;
    let calendar = ctx.analytics.calendar(habit_count, &logs, year, today)?;

    let mut message = format!(
        "📅 **Activity in {}**\n\n{}\n\n\
         - Total completions: {}\n\
         - Active days: {}\n\
         - Current streak: {} days\n\
         - Longest streak: {} days",
        year,
        render_heatmap(&calendar),
        calendar.stats.total_completions,
        calendar.stats.active_days,
        calendar.stats.current_streak,
        calendar.stats.longest_streak
    );

    let busiest = calendar
        .grid
        .days()
        .filter(|day| day.completed_count > 0)
        .max_by_key(|day| day.completed_count);
    if let Some(day) = busiest {
        message.push_str(&format!(
            "\n- Busiest day: {} ({} completions)",
            day.date, day.completed_count
        ));
    }
    if let Some(day) = calendar.grid.day(today) {
        message.push_str(&format!(
            "\n- Today: {}/{} ({:.0}%)",
            day.completed_count, day.total_count, day.percentage
        ));
    }

    Ok(CalendarResponse { calendar, message })
}

/// Weekday rows, week columns; blank cells lie outside the year
fn render_heatmap(calendar: &CalendarView) -> String {
    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(row, label)| {
            let cells: String = calendar
                .grid
                .weeks
                .iter()
                .map(|week| week[row].as_ref().map_or(' ', |day| day.level().glyph()))
                .collect();
            format!("{} {}", label, cells)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
