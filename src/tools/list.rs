/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::HabitWithStats;
use crate::storage::HabitFlowStore;
use crate::tools::{ToolContext, ToolError};

/// Parameters for listing habits (none yet)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitWithStats>,
    pub message: String,
}

/// List the user's habits, oldest first, with their streaks
pub fn list_habits<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    _params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let habits = ctx.storage.list_habits(ctx.user)?;
    let logs = ctx.storage.list_logs(ctx.user)?;
    let habits = ctx
        .analytics
        .habits_with_stats(habits, &logs, ctx.analytics.today());

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                format!(
                    "{} **{}** ({})\n   🔥 Streak: {} days | Best: {} days | Today: {}",
                    h.habit.icon,
                    h.habit.name,
                    h.habit.id,
                    h.current_streak,
                    h.longest_streak,
                    if h.completed_today { "done" } else { "not yet" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!("📋 **Habits** ({})\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
