/// MCP protocol round trips through the JSON-RPC line handler
use async_trait::async_trait;
use habitflow::mcp::McpServer;
use habitflow::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

struct CannedGenerator(&'static str);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, DigestError> {
        Ok(self.0.to_string())
    }
}

struct BrokenGenerator;

#[async_trait]
impl TextGenerator for BrokenGenerator {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, DigestError> {
        Err(DigestError::Generation {
            status: Some(401),
            message: "invalid api key".to_string(),
        })
    }
}

async fn server_with(generator: Option<Box<dyn TextGenerator>>) -> (McpServer, NamedTempFile) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let mut server = HabitFlowServer::new(ServerConfig::new(temp_file.path()))
        .await
        .expect("Failed to create server");
    if let Some(generator) = generator {
        server = server.with_text_generator(generator);
    }
    (McpServer::new(server), temp_file)
}

async fn request(server: &mut McpServer, id: u64, method: &str, params: Value) -> Value {
    let line = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string();
    let response = server.process_line(&line).await.expect("request gets a response");
    serde_json::to_value(response).unwrap()
}

async fn call(server: &mut McpServer, name: &str, arguments: Value) -> (bool, String) {
    let response = request(server, 1, "tools/call", json!({"name": name, "arguments": arguments})).await;
    let result = &response["result"];
    (
        result["isError"].as_bool().unwrap(),
        result["content"][0]["text"].as_str().unwrap().to_string(),
    )
}

/// Pull the `Habit ID: <uuid>` line out of a habit_create reply
fn habit_id_from(text: &str) -> String {
    text.lines()
        .find_map(|line| line.strip_prefix("Habit ID: "))
        .expect("habit id in reply")
        .trim()
        .to_string()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let (mut server, _db) = server_with(None).await;

    let init = request(&mut server, 1, "initialize", json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {},
        "clientInfo": {"name": "test", "version": "1"}
    }))
    .await;
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(init["result"]["serverInfo"]["name"], "HabitFlow");

    // Notification: no response
    let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
    assert!(server.process_line(&notification).await.is_none());
    assert!(server.is_initialized());

    let tools = request(&mut server, 2, "tools/list", json!({})).await;
    let names: Vec<&str> = tools["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"habit_toggle"));
    assert!(names.contains(&"digest_generate"));
    assert_eq!(names.len(), 14);
}

#[tokio::test]
async fn test_protocol_errors() {
    let (mut server, _db) = server_with(None).await;

    let bad_json = server.process_line("{not json").await.unwrap();
    assert_eq!(serde_json::to_value(bad_json).unwrap()["error"]["code"], -32700);

    let unknown = request(&mut server, 3, "resources/list", json!({})).await;
    assert_eq!(unknown["error"]["code"], -32601);

    let (is_error, text) = call(&mut server, "habit_fly", json!({})).await;
    assert!(is_error);
    assert!(text.contains("Unknown tool"));

    let (is_error, text) = call(&mut server, "habit_create", json!({"icon": "🏃"})).await;
    assert!(is_error);
    assert!(text.contains("Invalid parameters"));
}

#[tokio::test]
async fn test_habit_lifecycle_over_mcp() {
    let (mut server, _db) = server_with(None).await;

    let (is_error, text) = call(&mut server, "habit_create", json!({"name": "Run", "icon": "🏃"})).await;
    assert!(!is_error, "{}", text);
    let habit_id = habit_id_from(&text);

    let (_, text) = call(&mut server, "habit_toggle", json!({"habit_id": habit_id})).await;
    assert!(text.contains("Logged 'Run'"));

    let (_, text) = call(&mut server, "habit_list", json!({})).await;
    assert!(text.contains("Streak: 1 days"));

    let (_, text) = call(&mut server, "habit_toggle", json!({"habit_id": habit_id})).await;
    assert!(text.contains("Unlogged 'Run'"));

    let (_, text) = call(&mut server, "dashboard", Value::Null).await;
    assert!(text.contains("Completed today: 0/1"));

    let (is_error, _) = call(&mut server, "habit_delete", json!({"habit_id": habit_id})).await;
    assert!(!is_error);
    let (is_error, _) = call(&mut server, "habit_toggle", json!({"habit_id": habit_id})).await;
    assert!(is_error);
}

#[tokio::test]
async fn test_digest_generation_over_mcp() {
    let (mut server, _db) = server_with(Some(Box::new(CannedGenerator("## Nice week")))).await;

    let (is_error, text) = call(&mut server, "digest_generate", json!({})).await;
    assert!(!is_error, "{}", text);
    assert!(text.contains("## Nice week"));

    let (_, text) = call(&mut server, "digest_list", json!({})).await;
    assert!(text.contains("## Nice week"));
}

#[tokio::test]
async fn test_failed_digest_is_reported_and_not_stored() {
    let (mut server, _db) = server_with(Some(Box::new(BrokenGenerator))).await;

    let (is_error, text) = call(&mut server, "digest_generate", json!({})).await;
    assert!(is_error);
    assert_eq!(text, "Error: Failed to generate weekly digest. Please check your API key.");

    let (_, text) = call(&mut server, "digest_list", json!({})).await;
    assert!(text.starts_with("No digests yet"));
}

#[tokio::test]
async fn test_digest_without_key_explains_setup() {
    let (mut server, _db) = server_with(None).await;

    let (is_error, text) = call(&mut server, "digest_generate", json!({})).await;
    assert!(is_error);
    assert!(text.contains("OPENAI_API_KEY"));
}
