//! Configuration sections of `marketing.yaml`.

use std::time::Duration;

use serde::Deserialize;

use pick_server::infrastructure::config::Secret;
use pick_server::infrastructure::retry::RetryConfig;

use super::ConfigError;
use crate::domain::cafe::DEFAULT_EXCLUDED_BOARDS;

fn present(secret: Option<&Secret>) -> Option<&Secret> {
    secret.filter(|s| !s.expose().trim().is_empty())
}

fn require<'a>(secret: Option<&'a Secret>, env_var: &str) -> Result<&'a Secret, ConfigError> {
    present(secret).ok_or_else(|| ConfigError::MissingEnvVar(env_var.to_string()))
}

/// HTTP listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) const fn default_port() -> u16 {
    3001
}

/// YouTube Data API.
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSection {
    /// API key.
    #[serde(default)]
    pub api_key: Option<Secret>,
    /// API root.
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
    /// Videos kept per keyword.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Upload window in hours.
    #[serde(default = "default_hours_back")]
    pub hours_back: i64,
}

impl Default for YouTubeSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_youtube_base_url(),
            max_results: default_max_results(),
            hours_back: default_hours_back(),
        }
    }
}

impl YouTubeSection {
    /// The API key, or `MissingEnvVar` naming the variable that sets it.
    pub fn require_key(&self) -> Result<&Secret, ConfigError> {
        require(self.api_key.as_ref(), "YOUTUBE_API_KEY")
    }
}

fn default_youtube_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

pub(crate) const fn default_max_results() -> u32 {
    5
}

pub(crate) const fn default_hours_back() -> i64 {
    24
}

/// Gemini API.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSection {
    /// API key.
    #[serde(default)]
    pub api_key: Option<Secret>,
    /// API root.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

impl GeminiSection {
    /// The API key, or `MissingEnvVar` naming the variable that sets it.
    pub fn require_key(&self) -> Result<&Secret, ConfigError> {
        require(self.api_key.as_ref(), "GEMINI_API_KEY")
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Naver open search API.
#[derive(Debug, Clone, Deserialize)]
pub struct NaverSection {
    /// Client id.
    #[serde(default)]
    pub client_id: Option<Secret>,
    /// Client secret.
    #[serde(default)]
    pub client_secret: Option<Secret>,
    /// API root.
    #[serde(default = "default_naver_base_url")]
    pub base_url: String,
    /// Boards whose posts are skipped.
    #[serde(default = "default_excluded_boards")]
    pub excluded_boards: Vec<String>,
}

impl Default for NaverSection {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: default_naver_base_url(),
            excluded_boards: default_excluded_boards(),
        }
    }
}

impl NaverSection {
    /// Client id and secret, or `MissingEnvVar` for the first one missing.
    pub fn require_credentials(&self) -> Result<(&Secret, &Secret), ConfigError> {
        Ok((
            require(self.client_id.as_ref(), "NAVER_CLIENT_ID")?,
            require(self.client_secret.as_ref(), "NAVER_CLIENT_SECRET")?,
        ))
    }
}

fn default_naver_base_url() -> String {
    "https://openapi.naver.com".to_string()
}

fn default_excluded_boards() -> Vec<String> {
    DEFAULT_EXCLUDED_BOARDS.iter().map(ToString::to_string).collect()
}

/// Outbound HTTP behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSection {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per call, the first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// First backoff in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff ceiling in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl HttpSection {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy.
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            ..RetryConfig::default()
        }
    }
}

pub(crate) const fn default_timeout_secs() -> u64 {
    30
}

pub(crate) const fn default_max_attempts() -> u32 {
    3
}

pub(crate) const fn default_initial_backoff_ms() -> u64 {
    500
}

pub(crate) const fn default_max_backoff_ms() -> u64 {
    10_000
}
