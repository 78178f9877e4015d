//! LLM Port (Driven Port)
//!
//! Text generation used for screening, drafting and cafe comments.

use async_trait::async_trait;

/// Gemini API error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeminiError {
    /// The API key is missing.
    #[error("Gemini API key is not configured")]
    NotConfigured,

    /// The API answered with a non-success status.
    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failed.
    #[error("Gemini request failed: {message}")]
    Transport { message: String },

    /// The reply had no text candidate.
    #[error("Gemini reply had no text: {message}")]
    EmptyReply { message: String },
}

/// Port for prompt completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    /// Complete `prompt` and return the reply text.
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}
