/// Public library interface for the HabitFlow MCP server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use std::path::PathBuf;

use thiserror::Error;

pub mod analytics;
pub mod digest;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{AnalyticsEngine, CalendarView, DashboardSummary};
pub use digest::{DigestError, OpenAiGenerator, TextGenerator};
pub use domain::*;
pub use storage::{HabitFlowStore, SqliteStorage, StorageError};
pub use tools::{ToolContext, ToolError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Digest configuration error: {0}")]
    Digest(#[from] digest::DigestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the server needs to start
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database file
    pub database: PathBuf,
    /// The user every tool call acts for
    pub user: String,
    /// IANA timezone deciding which calendar day "today" is
    pub timezone: String,
    /// Digests are disabled without a key
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
}

impl ServerConfig {
    /// Defaults for everything but the database path
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            user: "local".to_string(),
            timezone: "UTC".to_string(),
            openai_api_key: None,
            openai_base_url: digest::DEFAULT_BASE_URL.to_string(),
            model: digest::DEFAULT_MODEL.to_string(),
        }
    }
}

/// Main HabitFlow server that implements the MCP protocol
///
/// This server manages habit, book and digest data through a SQLite
/// database on behalf of a single configured user.
pub struct HabitFlowServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
    generator: Option<Box<dyn TextGenerator>>,
    user: UserId,
}

impl HabitFlowServer {
    /// Create a new server from its configuration
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing HabitFlow server with database: {:?}", config.database);

        let zone = ReferenceZone::from_name(&config.timezone)?;
        let user = UserId::new(config.user)?;
        let storage = SqliteStorage::new(&config.database)?;

        let generator: Option<Box<dyn TextGenerator>> = match config.openai_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                let generator = OpenAiGenerator::new(&config.openai_base_url, key, &config.model)?;
                Some(Box::new(generator) as Box<dyn TextGenerator>)
            }
            _ => {
                tracing::info!("No OpenAI API key configured, weekly digests are disabled");
                None
            }
        };

        tracing::info!("Acting for user '{}' in timezone {}", user, zone.name());

        Ok(Self {
            storage,
            analytics: AnalyticsEngine::new(zone),
            generator,
            user,
        })
    }

    /// Replace the text generator used for digests
    pub fn with_text_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let habits = self.storage.list_habits(&self.user)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn text_generator(&self) -> Option<&dyn TextGenerator> {
        self.generator.as_deref()
    }

    /// Bundle what the tools need for one call
    pub fn tool_context(&self) -> ToolContext<'_, SqliteStorage> {
        ToolContext {
            storage: &self.storage,
            analytics: &self.analytics,
            user: &self.user,
        }
    }
}
