/// Tool for deleting habits
///
/// Deleting is permanent: the habit and its whole completion history go.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::HabitFlowStore;
use crate::tools::{parse_habit_id, ToolContext, ToolError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub habit_id: String,
    pub message: String,
}

pub fn delete_habit<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = ctx.storage.get_habit(ctx.user, &habit_id)?;

    ctx.storage.delete_habit(ctx.user, &habit_id)?;
    tracing::info!("Deleted habit '{}' ({})", habit.name, habit_id);

    Ok(DeleteHabitResponse {
        habit_id: habit_id.to_string(),
        message: format!("🗑️ Deleted habit '{}' and its history", habit.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayKey;
    use crate::tools::test_support::Fixture;
    use crate::tools::{create_habit, CreateHabitParams};

    #[test]
    fn test_delete_removes_habit_and_logs() {
        let fixture = Fixture::new();
        let habit = create_habit(
            &fixture.ctx(),
            CreateHabitParams { name: "Stretch".to_string(), icon: None, color: None, target_days: None },
        )
        .unwrap()
        .habit;
        fixture.storage.upsert_log(&habit.id, DayKey::parse("2024-01-01").unwrap()).unwrap();

        let response = delete_habit(&fixture.ctx(), DeleteHabitParams { habit_id: habit.id.to_string() }).unwrap();

        assert!(response.message.contains("Stretch"));
        assert!(fixture.storage.list_habits(&fixture.user).unwrap().is_empty());
        assert!(fixture.storage.list_logs(&fixture.user).unwrap().is_empty());

        // Second delete finds nothing
        let again = delete_habit(&fixture.ctx(), DeleteHabitParams { habit_id: habit.id.to_string() });
        assert!(matches!(again, Err(ToolError::Storage(_))));
    }
}
