/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, TargetDays};
use crate::storage::HabitFlowStore;
use crate::tools::{ToolContext, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit, 1 to 100 characters
    pub name: String,
    /// Emoji shown next to the name (defaults to ✅)
    pub icon: Option<String>,
    /// Hex colour like #22c55e
    pub color: Option<String>,
    /// Weekdays the habit is planned for, 1 = Monday to 7 = Sunday (defaults to every day)
    pub target_days: Option<Vec<u8>>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit for the current user
pub fn create_habit<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let target_days = params.target_days.map(TargetDays::new).transpose()?;

    let habit = Habit::new(
        ctx.user.clone(),
        params.name,
        params.icon,
        params.color,
        target_days,
    )?;

    ctx.storage.create_habit(&habit)?;
    tracing::info!("Created habit '{}' for {}", habit.name, ctx.user);

    let message = format!(
        "{} Created habit '{}'! Ready to start your streak!\nHabit ID: {}",
        habit.icon, habit.name, habit.id
    );

    Ok(CreateHabitResponse { habit, message })
}
