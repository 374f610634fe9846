/// Tool for the dashboard overview
///
/// This module implements the dashboard MCP tool: today's progress, the best
/// running streak and how many books are being read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::DashboardSummary;
use crate::domain::HabitWithStats;
use crate::storage::HabitFlowStore;
use crate::tools::{ToolContext, ToolError};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DashboardParams {}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
    pub habits: Vec<HabitWithStats>,
    pub message: String,
}

pub fn get_dashboard<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    _params: DashboardParams,
) -> Result<DashboardResponse, ToolError> {
    let today = ctx.analytics.today();
    let habits = ctx.storage.list_habits(ctx.user)?;
    let logs = ctx.storage.list_logs(ctx.user)?;
    let books = ctx.storage.list_books(ctx.user, None)?;

    let habits = ctx.analytics.habits_with_stats(habits, &logs, today);
    let summary = ctx.analytics.dashboard(&habits, &books);

    let mut message = format!(
        "📊 **Dashboard for {}**\n\
         - Completed today: {}/{}\n\
         - Best current streak: {} days\n\
         - Books in progress: {}",
        today,
        summary.completed_today,
        summary.total_habits,
        summary.best_current_streak,
        summary.reading_books
    );

    let pending: Vec<&str> = habits
        .iter()
        .filter(|h| !h.completed_today)
        .map(|h| h.habit.name.as_str())
        .collect();
    if !pending.is_empty() {
        message.push_str(&format!("\n\nStill to do today: {}", pending.join(", ")));
    }

    Ok(DashboardResponse {
        summary,
        habits,
        message,
    })
}
