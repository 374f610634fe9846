/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Routes tool calls to the tools module
/// 3. Sends JSON-RPC responses to stdout

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, parse_params, ToolError};
use crate::{HabitFlowServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    habitflow: HabitFlowServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

impl McpServer {
    pub fn new(habitflow: HabitFlowServer) -> Self {
        Self {
            habitflow,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Whether `initialized` has been received
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let id = request.id.clone();
        let response = self.handle_request(request).await;

        // Notifications never get an answer
        id.map(|_| response)
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "HabitFlow".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": tool_definitions() }))
    }

    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value::<ToolCallParams>) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let arguments = match tool_params.arguments {
            Value::Null => json!({}),
            other => other,
        };

        let result = match self.call_tool(&tool_params.name, arguments).await {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!("Tool '{}' failed: {}", tool_params.name, e);
                ToolCallResult::error(e.user_message())
            }
        };

        to_response(id, &result)
    }

    /// Route a tool call and render its result as text
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let ctx = self.habitflow.tool_context();

        match name {
            "habit_create" => tools::create_habit(&ctx, parse_params(arguments)?).map(|r| r.message),
            "habit_update" => tools::update_habit(&ctx, parse_params(arguments)?).map(|r| r.message),
            "habit_delete" => tools::delete_habit(&ctx, parse_params(arguments)?).map(|r| r.message),
            "habit_toggle" => tools::toggle_habit(&ctx, parse_params(arguments)?).map(|r| r.message),
            "habit_list" => tools::list_habits(&ctx, parse_params(arguments)?).map(|r| r.message),
            "dashboard" => tools::get_dashboard(&ctx, parse_params(arguments)?).map(|r| r.message),
            "activity_calendar" => {
                tools::activity_calendar(&ctx, parse_params(arguments)?).map(|r| r.message)
            }
            "book_create" => tools::create_book(&ctx, parse_params(arguments)?).map(|r| r.message),
            "book_list" => tools::list_books(&ctx, parse_params(arguments)?).map(|r| r.message),
            "book_update" => tools::update_book(&ctx, parse_params(arguments)?).map(|r| r.message),
            "book_progress" => {
                tools::update_progress(&ctx, parse_params(arguments)?).map(|r| r.message)
            }
            "book_delete" => tools::delete_book(&ctx, parse_params(arguments)?).map(|r| r.message),
            "digest_generate" => tools::generate_digest(
                &ctx,
                self.habitflow.text_generator(),
                parse_params(arguments)?,
            )
            .await
            .map(|r| r.message),
            "digest_list" => tools::list_digests(&ctx, parse_params(arguments)?).map(|r| r.message),
            _ => Err(ToolError::InvalidParams(format!("Unknown tool: {}", name))),
        }
    }
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}

/// Every tool the server offers, with generated input schemas
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new habit to track",
        ),
        ToolDefinition::new::<tools::UpdateHabitParams>(
            "habit_update",
            "Change a habit's name, icon, colour or target days",
        ),
        ToolDefinition::new::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit together with its completion history",
        ),
        ToolDefinition::new::<tools::ToggleHabitParams>(
            "habit_toggle",
            "Mark a habit done for a day, or undo it if it was already done (defaults to today)",
        ),
        ToolDefinition::new::<tools::ListHabitsParams>(
            "habit_list",
            "List all habits with current and longest streaks and today's status",
        ),
        ToolDefinition::new::<tools::DashboardParams>(
            "dashboard",
            "Today's overview: completed habits, best streak and books in progress",
        ),
        ToolDefinition::new::<tools::CalendarParams>(
            "activity_calendar",
            "Yearly activity heatmap across all habits with summary stats",
        ),
        ToolDefinition::new::<tools::CreateBookParams>("book_create", "Add a book to the reading list"),
        ToolDefinition::new::<tools::ListBooksParams>(
            "book_list",
            "List books with reading progress, optionally filtered by status",
        ),
        ToolDefinition::new::<tools::UpdateBookParams>(
            "book_update",
            "Update a book's details or status",
        ),
        ToolDefinition::new::<tools::BookProgressParams>(
            "book_progress",
            "Record the page you have reached in a book",
        ),
        ToolDefinition::new::<tools::DeleteBookParams>("book_delete", "Remove a book from the list"),
        ToolDefinition::new::<tools::GenerateDigestParams>(
            "digest_generate",
            "Generate an AI-written summary of this week's habits and reading",
        ),
        ToolDefinition::new::<tools::ListDigestsParams>(
            "digest_list",
            "Show the most recent weekly digests",
        ),
    ]
}
