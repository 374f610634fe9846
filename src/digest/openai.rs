/// OpenAI-compatible chat completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::digest::{DigestError, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Text generator backed by a `/chat/completions` endpoint
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// HTTPS is required, except for a model server on this machine
fn validate_base_url(base_url: &str) -> Result<(), DigestError> {
    let parsed = reqwest::Url::parse(base_url).map_err(|e| {
        DigestError::NotConfigured(format!("Invalid base URL '{}': {}", base_url, e))
    })?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            let host = parsed.host_str().unwrap_or("");
            if matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1") {
                tracing::warn!(
                    "Using unencrypted HTTP for local model server at '{}'",
                    base_url
                );
                Ok(())
            } else {
                Err(DigestError::NotConfigured(format!(
                    "HTTP is only allowed for localhost, use HTTPS for '{}'",
                    base_url
                )))
            }
        }
        scheme => Err(DigestError::NotConfigured(format!(
            "Unsupported URL scheme '{}' in '{}'",
            scheme, base_url
        ))),
    }
}

impl OpenAiGenerator {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, DigestError> {
        if api_key.trim().is_empty() {
            return Err(DigestError::NotConfigured("API key is empty".to_string()));
        }
        validate_base_url(base_url)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DigestError::NotConfigured(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, system: &str, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        })
    }
}

/// Pull the first choice's text out of a completion response
fn extract_content(data: &Value) -> Result<String, DigestError> {
    let content = data["choices"]
        .get(0)
        .and_then(|choice| choice["message"]["content"].as_str())
        .map(str::trim)
        .unwrap_or("");

    if content.is_empty() {
        return Err(DigestError::generation("Model returned no content"));
    }

    Ok(content.to_string())
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DigestError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::info!("Requesting digest from {} using {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(system, prompt))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Digest request failed: {}", e);
                DigestError::generation(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DigestError::generation(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("Model API returned {}: {}", status, text);
            return Err(DigestError::Generation {
                status: Some(status.as_u16()),
                message: text.chars().take(500).collect(),
            });
        }

        let data: Value = serde_json::from_str(&text)
            .map_err(|e| DigestError::generation(format!("Malformed response: {}", e)))?;

        extract_content(&data)
    }
}
