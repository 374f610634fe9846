/// Basic integration tests against on-disk databases
use habitflow::tools::{
    create_book, create_habit, delete_habit, get_dashboard, toggle_habit, update_progress,
    BookProgressParams, CreateBookParams, CreateHabitParams, DashboardParams, DeleteHabitParams,
    ToggleHabitParams,
};
use habitflow::*;
use tempfile::NamedTempFile;

fn habit_params(name: &str) -> CreateHabitParams {
    CreateHabitParams {
        name: name.to_string(),
        icon: None,
        color: None,
        target_days: None,
    }
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitFlowServer::new(ServerConfig::new(temp_file.path()))
            .await
            .expect("Failed to create server");
        let ctx = server.tool_context();

        let habit = create_habit(&ctx, habit_params("Walk")).unwrap().habit;
        let toggled = toggle_habit(&ctx, ToggleHabitParams { habit_id: habit.id.to_string(), date: None }).unwrap();
        assert!(toggled.completed);

        let book = create_book(
            &ctx,
            CreateBookParams {
                title: "Dune".to_string(),
                author: Some("Frank Herbert".to_string()),
                total_pages: Some(400),
                status: Some("reading".to_string()),
            },
        )
        .unwrap()
        .book;
        let progressed = update_progress(
            &ctx,
            BookProgressParams { book_id: book.book.id.to_string(), current_page: 100 },
        )
        .unwrap();
        assert_eq!(progressed.book.progress, 25);

        let dashboard = get_dashboard(&ctx, DashboardParams::default()).unwrap();
        assert_eq!(dashboard.summary.completed_today, 1);
        assert_eq!(dashboard.summary.best_current_streak, 1);
        assert_eq!(dashboard.summary.reading_books, 1);
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let config = ServerConfig::new(temp_file.path());

        let habit_id = {
            let server = HabitFlowServer::new(config.clone())
                .await
                .expect("Failed to create first server");
            let ctx = server.tool_context();
            let habit = create_habit(&ctx, habit_params("Meditate")).unwrap().habit;
            server.storage().upsert_log(&habit.id, server.analytics().today()).unwrap();
            habit.id
        };

        let server = HabitFlowServer::new(config)
            .await
            .expect("Failed to create second server");

        let habits = server.storage().list_habits(server.user()).unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].id, habit_id);
        assert_eq!(server.storage().list_logs(server.user()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_users_do_not_see_each_other() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");

        let mut alice_config = ServerConfig::new(temp_file.path());
        alice_config.user = "alice".to_string();
        let alice = HabitFlowServer::new(alice_config).await.unwrap();
        let habit = create_habit(&alice.tool_context(), habit_params("Swim")).unwrap().habit;

        let mut bob_config = ServerConfig::new(temp_file.path());
        bob_config.user = "bob".to_string();
        let bob = HabitFlowServer::new(bob_config).await.unwrap();

        assert!(bob.storage().list_habits(bob.user()).unwrap().is_empty());
        let result = delete_habit(&bob.tool_context(), DeleteHabitParams { habit_id: habit.id.to_string() });
        assert!(matches!(result, Err(ToolError::Storage(StorageError::HabitNotFound { .. }))));
        assert_eq!(alice.storage().list_habits(alice.user()).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_cascades_on_disk() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
        let user = UserId::new("alice").unwrap();

        let habit = Habit::new(user.clone(), "Read".to_string(), None, None, None).unwrap();
        storage.create_habit(&habit).unwrap();
        let today = DayKey::parse("2024-02-10").unwrap();
        for offset in 0..5 {
            storage.upsert_log(&habit.id, today.add_days(-offset)).unwrap();
        }

        storage.delete_habit(&user, &habit.id).unwrap();
        assert!(storage.list_logs(&user).unwrap().is_empty());
    }
}
