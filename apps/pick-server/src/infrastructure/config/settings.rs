//! Server Configuration Settings
//!
//! Configuration types for the pick server, loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::application::use_cases::DEFAULT_SITE_URL;
use crate::infrastructure::retry::RetryConfig;

/// Marketing bot address used when none is configured.
pub const DEFAULT_MARKETING_BOT_URL: &str = "http://localhost:3001";

/// A secret value that never shows up in logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Resend email settings.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    /// Resend API key; email is only logged without one.
    pub api_key: Option<Secret>,
    /// Sender address or bare domain.
    pub from_email: Option<String>,
    /// Pause between two sends.
    pub send_interval: Duration,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: None,
            send_interval: Duration::from_millis(50),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Marketing bot client settings.
#[derive(Debug, Clone)]
pub struct MarketingBotSettings {
    /// Bot base URL.
    pub base_url: String,
    /// Request timeout. The daily run crawls and drafts before answering.
    pub timeout: Duration,
}

impl Default for MarketingBotSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKETING_BOT_URL.to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener settings.
    pub server: ServerSettings,
    /// Public site root used in email links.
    pub site_url: String,
    /// Email delivery.
    pub email: EmailSettings,
    /// Shared secret of the cron endpoints.
    pub cron_secret: Option<Secret>,
    /// Marketing bot client.
    pub marketing_bot: MarketingBotSettings,
    /// Retry policy of outbound HTTP calls.
    pub retry: RetryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            site_url: DEFAULT_SITE_URL.to_string(),
            email: EmailSettings::default(),
            cron_secret: None,
            marketing_bot: MarketingBotSettings::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// Every setting has a default; blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a set value cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server = ServerSettings {
            host: env_string("PICK_SERVER_HOST").unwrap_or(defaults.server.host),
            port: parse_env_u16("PICK_SERVER_PORT", defaults.server.port),
        };

        let api_key = env_string("RESEND_API_KEY").filter(|key| {
            let valid = key.starts_with("re_");
            if !valid {
                tracing::warn!("RESEND_API_KEY does not start with re_, emails will only be logged");
            }
            valid
        });

        let email = EmailSettings {
            api_key: api_key.map(Secret::new),
            from_email: env_string("RESEND_FROM_EMAIL"),
            send_interval: parse_env_duration_millis(
                "EMAIL_SEND_INTERVAL_MS",
                defaults.email.send_interval,
            ),
            timeout: parse_env_duration_secs("EMAIL_TIMEOUT_SECS", defaults.email.timeout),
        };

        let marketing_bot = MarketingBotSettings {
            base_url: env_string("MARKETING_BOT_API_URL")
                .map_or(defaults.marketing_bot.base_url, |u| {
                    u.trim_end_matches('/').to_string()
                }),
            timeout: parse_env_duration_secs(
                "MARKETING_BOT_TIMEOUT_SECS",
                defaults.marketing_bot.timeout,
            ),
        };

        let retry = RetryConfig {
            max_attempts: parse_env_u32("HTTP_RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts),
            initial_backoff: parse_env_duration_millis(
                "HTTP_RETRY_INITIAL_BACKOFF_MS",
                defaults.retry.initial_backoff,
            ),
            max_backoff: parse_env_duration_secs(
                "HTTP_RETRY_MAX_BACKOFF_SECS",
                defaults.retry.max_backoff,
            ),
            multiplier: defaults.retry.multiplier,
        };
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_RETRY_MAX_ATTEMPTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            server,
            site_url: env_string("NEXT_PUBLIC_SITE_URL").unwrap_or(defaults.site_url),
            email,
            cron_secret: env_string("CRON_SECRET").map(Secret::new),
            marketing_bot,
            retry,
        })
    }

    /// Socket address to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable has an unusable value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Trimmed value of a variable, `None` when unset or blank.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacted_debug() {
        let secret = Secret::new("re_123456".to_string());
        let debug = format!("{secret:?}");
        assert!(!debug.contains("re_123456"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(secret.expose(), "re_123456");
    }

    #[test]
    fn config_debug_hides_secrets() {
        let config = ServerConfig {
            cron_secret: Some(Secret::new("cron-secret-value".to_string())),
            ..ServerConfig::default()
        };
        assert!(!format!("{config:?}").contains("cron-secret-value"));
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site_url, "https://real-pick.com");
        assert_eq!(config.email.send_interval, Duration::from_millis(50));
        assert_eq!(config.marketing_bot.base_url, "http://localhost:3001");
        assert!(config.cron_secret.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_variables_use_defaults() {
        assert_eq!(parse_env_u16("PICK_SERVER_TEST_UNSET_PORT", 1234), 1234);
        assert_eq!(
            parse_env_duration_millis("PICK_SERVER_TEST_UNSET_MS", Duration::from_millis(7)),
            Duration::from_millis(7)
        );
        assert!(env_string("PICK_SERVER_TEST_UNSET_STRING").is_none());
    }
}
