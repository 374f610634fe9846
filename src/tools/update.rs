/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to modify
/// existing habit properties like name, icon, colour and target days.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, TargetDays};
use crate::storage::HabitFlowStore;
use crate::tools::{parse_habit_id, ToolContext, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to change
    pub habit_id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Weekdays, 1 = Monday to 7 = Sunday
    pub target_days: Option<Vec<u8>>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Update an existing habit of the current user
pub fn update_habit<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    if params.name.is_none()
        && params.icon.is_none()
        && params.color.is_none()
        && params.target_days.is_none()
    {
        return Err(ToolError::InvalidParams(
            "Nothing to update: provide name, icon, color or target_days".to_string(),
        ));
    }

    let target_days = params.target_days.map(TargetDays::new).transpose()?;

    let mut habit = ctx.storage.get_habit(ctx.user, &habit_id)?;
    habit.update(params.name, params.icon, params.color, target_days)?;
    ctx.storage.update_habit(&habit)?;

    let message = format!("✅ Updated habit '{}'", habit.name);
    Ok(UpdateHabitResponse { habit, message })
}
