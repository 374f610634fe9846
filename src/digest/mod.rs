/// Weekly digest generation
///
/// A digest is a short coaching text produced by a language model from the
/// week's habit and reading numbers. This module builds the prompt and talks
/// to the model; storing the result is left to the caller.

pub mod openai;
pub mod prompt;

pub use openai::*;
pub use prompt::*;

use async_trait::async_trait;
use thiserror::Error;

/// Instructions sent as the system message with every digest request
pub const SYSTEM_PROMPT: &str = "You are a supportive habit coach providing weekly progress summaries. \
Be encouraging but honest. Use emojis sparingly. Keep it concise (max 300 words). \
Format with markdown headings.";

/// Errors that can occur while generating a digest
#[derive(Error, Debug)]
pub enum DigestError {
    /// The provider failed or returned nothing usable
    #[error("Digest generation failed{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Generation {
        status: Option<u16>,
        message: String,
    },

    #[error("Digest generator not configured: {0}")]
    NotConfigured(String),
}

impl DigestError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            status: None,
            message: message.into(),
        }
    }

    /// Short text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation { .. } => {
                "Failed to generate weekly digest. Please check your API key.".to_string()
            }
            Self::NotConfigured(_) => {
                "Weekly digests are not available: no OpenAI API key is configured (set OPENAI_API_KEY)."
                    .to_string()
            }
        }
    }
}

/// A language model that turns a prompt into text
///
/// One call per digest; implementations do not retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DigestError>;
}
