/// Basic unit tests to verify core functionality
use habitflow::*;
use tempfile::NamedTempFile;

fn day(s: &str) -> DayKey {
    DayKey::parse(s).expect("valid day key")
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let user = UserId::new("alice").unwrap();
        let habit = Habit::new(
            user.clone(),
            "Test Habit".to_string(),
            Some("🧪".to_string()),
            None,
            None,
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.user_id, user);
        assert_eq!(habit.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_habit_log_creation() {
        let habit_id = HabitId::new();
        let today = day("2024-06-01");

        let log = HabitLog::new(habit_id.clone(), today);

        assert_eq!(log.habit_id, habit_id);
        assert_eq!(log.completed_at, today);
    }

    #[test]
    fn test_reading_progress_examples() {
        assert_eq!(reading_progress(0, Some(0)), 0);
        assert_eq!(reading_progress(150, Some(300)), 50);
        assert_eq!(reading_progress(350, Some(300)), 100);
        assert_eq!(reading_progress(5, None), 0);
        assert_eq!(reading_progress(1, Some(3)), 33);
    }

    #[test]
    fn test_seven_day_activity_range() {
        let habit_id = HabitId::new();
        let logs = vec![HabitLog::new(habit_id, day("2024-01-03"))];

        let grid = build_activity_grid(&logs, 2, day("2024-01-01"), day("2024-01-07")).unwrap();

        assert_eq!(grid.day(day("2024-01-03")).unwrap().percentage, 50.0);
        assert_eq!(grid.day(day("2024-01-05")).unwrap().percentage, 0.0);
        // Slots outside the range are empty
        let padding = grid.weeks.iter().flatten().filter(|slot| slot.is_none()).count();
        assert_eq!(padding, 7);
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitFlowServer::new(ServerConfig::new(temp_file.path())).await;
        assert!(server.is_ok());
        assert!(server.unwrap().text_generator().is_none());
    }

    #[tokio::test]
    async fn test_server_rejects_unknown_timezone() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut config = ServerConfig::new(temp_file.path());
        config.timezone = "Nowhere/Special".to_string();

        let result = HabitFlowServer::new(config).await;
        assert!(matches!(result, Err(ServerError::Domain(DomainError::InvalidTimezone(_)))));
    }

    #[test]
    fn test_server_rejects_plain_http_provider() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut config = ServerConfig::new(temp_file.path());
        config.openai_api_key = Some("sk-test".to_string());
        config.openai_base_url = "http://models.example.com/v1".to_string();

        let result = tokio_test::block_on(HabitFlowServer::new(config));
        assert!(matches!(result, Err(ServerError::Digest(DigestError::NotConfigured(_)))));
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_storage_is_object_safe() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let store: &dyn HabitFlowStore = &storage;
        let user = UserId::new("alice").unwrap();
        assert!(store.list_habits(&user).unwrap().is_empty());
    }
}
