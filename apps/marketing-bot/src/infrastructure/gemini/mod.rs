//! Gemini `generateContent` adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use pick_server::infrastructure::config::Secret;
use pick_server::infrastructure::retry::RetryConfig;

use crate::application::ports::{GeminiError, LlmPort};
use crate::infrastructure::outbound::{OutboundError, send_with_retry};

/// Gemini API root.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, GeminiError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GeminiError::EmptyReply {
                message: block_reason.unwrap_or_else(|| "no candidates".to_string()),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyReply {
                message: candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty candidate".to_string()),
            });
        }
        Ok(text)
    }
}

/// Text generation backed by the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<Secret>,
    base_url: String,
    model: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("configured", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client. Without a key every call fails with `NotConfigured`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        api_key: Option<Secret>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            retry,
        })
    }

    /// Whether an API key is set.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl LlmPort for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let key = self.api_key.as_ref().ok_or(GeminiError::NotConfigured)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = send_with_retry("gemini", &self.retry, || {
            self.client
                .post(&url)
                .query(&[("key", key.expose())])
                .json(&body)
        })
        .await
        .map_err(|e| match e {
            OutboundError::Transport(message) => GeminiError::Transport { message },
            OutboundError::Status { status, body } => GeminiError::Api {
                status,
                message: serde_json::from_str::<ErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(body),
            },
        })?;

        let parsed: GenerateResponse =
            response.json().await.map_err(|e| GeminiError::Transport {
                message: e.to_string(),
            })?;
        let text = parsed.into_text()?;
        tracing::debug!(model = %self.model, chars = text.chars().count(), "Gemini replied");
        Ok(text)
    }
}
