/// MCP tools for habit, book and digest management
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call. Every tool acts on behalf of the single user the server was
/// started for and reads and writes through the storage it is handed.

pub mod books;
pub mod calendar;
pub mod create;
pub mod dashboard;
pub mod delete;
pub mod digest;
pub mod list;
pub mod log;
pub mod update;

// Re-export tool functions for easy access
pub use books::*;
pub use calendar::*;
pub use create::*;
pub use dashboard::*;
pub use delete::*;
pub use digest::*;
pub use list::*;
pub use log::*;
pub use update::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::analytics::AnalyticsEngine;
use crate::digest::DigestError;
use crate::domain::{BookId, DomainError, HabitId, UserId};
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Digest(#[from] DigestError),
}

impl ToolError {
    /// Text shown to the user in an error tool result
    pub fn user_message(&self) -> String {
        match self {
            Self::Digest(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// What every tool needs besides its own parameters
pub struct ToolContext<'a, S> {
    pub storage: &'a S,
    pub analytics: &'a AnalyticsEngine,
    pub user: &'a UserId,
}

/// Deserialize tool arguments into a parameter struct
pub fn parse_params<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    HabitId::from_string(raw.trim())
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit ID format: '{}'", raw)))
}

pub(crate) fn parse_book_id(raw: &str) -> Result<BookId, ToolError> {
    BookId::from_string(raw.trim())
        .map_err(|_| ToolError::InvalidParams(format!("Invalid book ID format: '{}'", raw)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::ReferenceZone;
    use crate::storage::SqliteStorage;

    pub struct Fixture {
        pub storage: SqliteStorage,
        pub analytics: AnalyticsEngine,
        pub user: UserId,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                storage: SqliteStorage::open_in_memory().unwrap(),
                analytics: AnalyticsEngine::new(ReferenceZone::utc()),
                user: UserId::new("tester").unwrap(),
            }
        }

        pub fn ctx(&self) -> ToolContext<'_, SqliteStorage> {
            ToolContext {
                storage: &self.storage,
                analytics: &self.analytics,
                user: &self.user,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_parse_params() {
        let sample: Sample = parse_params(json!({"name": "Run"})).unwrap();
        assert_eq!(sample.name, "Run");

        let err = parse_params::<Sample>(json!({})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }

    #[test]
    fn test_parse_ids() {
        assert!(parse_habit_id("not-a-uuid").is_err());
        let id = HabitId::new();
        assert_eq!(parse_habit_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_book_id(""), Err(ToolError::InvalidParams(_))));
    }

    #[test]
    fn test_digest_errors_use_friendly_message() {
        let err = ToolError::from(DigestError::generation("HTTP 500"));
        assert_eq!(err.user_message(), "Failed to generate weekly digest. Please check your API key.");
    }
}
