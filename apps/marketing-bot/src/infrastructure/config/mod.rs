//! Configuration for the marketing bot.
//!
//! Settings come from a YAML file (`MARKETING_CONFIG`, default
//! `marketing.yaml`) with `${VAR}` and `${VAR:-default}` interpolation.
//! API credentials set in the environment win over the file, so a bot with
//! no file at all runs on environment variables alone.
//!
//! # Usage
//!
//! ```rust,ignore
//! use marketing_bot::infrastructure::config::load_config;
//!
//! let config = load_config(None)?;
//! println!("HTTP port: {}", config.server.port);
//! ```

mod container;
mod sections;

use serde::Deserialize;
use thiserror::Error;

use pick_server::infrastructure::config::Secret;

use crate::application::dto::MAX_HOURS_BACK;

pub use container::{Adapters, Container, ContainerError};
pub use sections::{GeminiSection, HttpSection, NaverSection, ServerSection, YouTubeSection};

/// Default configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "marketing.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse configuration.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Required environment variable missing.
    #[error("Required environment variable missing: {0}")]
    MissingEnvVar(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerSection,
    /// YouTube Data API.
    #[serde(default)]
    pub youtube: YouTubeSection,
    /// Gemini API.
    #[serde(default)]
    pub gemini: GeminiSection,
    /// Naver open search API.
    #[serde(default)]
    pub naver: NaverSection,
    /// Outbound HTTP.
    #[serde(default)]
    pub http: HttpSection,
    /// Bearer secret guarding the scheduled run endpoint.
    #[serde(default)]
    pub cron_secret: Option<Secret>,
}

/// Load configuration from `path`, `MARKETING_CONFIG` or `marketing.yaml`.
///
/// A missing default file is not an error; the bot then runs on defaults
/// and environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if an explicit file cannot be read, or the
/// result cannot be parsed or validated.
pub fn load_config(path: Option<&str>) -> Result<BotConfig, ConfigError> {
    let explicit = path
        .map(str::to_string)
        .or_else(|| std::env::var("MARKETING_CONFIG").ok().filter(|p| !p.is_empty()));
    let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = match std::fs::read_to_string(&path) {
        Ok(contents) => parse(&contents)?,
        Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path, "No config file, using defaults");
            BotConfig::default()
        }
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<BotConfig, ConfigError> {
    let config = parse(yaml)?;
    validate_config(&config)?;
    Ok(config)
}

fn parse(yaml: &str) -> Result<BotConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    if interpolated.trim().is_empty() {
        return Ok(BotConfig::default());
    }
    Ok(serde_yaml_bw::from_str(&interpolated)?)
}

/// Environment variables that override the file.
fn apply_env_overrides(config: &mut BotConfig, lookup: impl Fn(&str) -> Option<String>) {
    let secret = |name: &str| lookup(name).filter(|v| !v.trim().is_empty()).map(Secret::new);

    if let Some(key) = secret("YOUTUBE_API_KEY") {
        config.youtube.api_key = Some(key);
    }
    if let Some(key) = secret("GEMINI_API_KEY") {
        config.gemini.api_key = Some(key);
    }
    if let Some(id) = secret("NAVER_CLIENT_ID") {
        config.naver.client_id = Some(id);
    }
    if let Some(key) = secret("NAVER_CLIENT_SECRET") {
        config.naver.client_secret = Some(key);
    }
    if let Some(key) = secret("CRON_SECRET") {
        config.cron_secret = Some(key);
    }
    if let Some(port) = lookup("MARKETING_BOT_PORT").and_then(|p| p.trim().parse().ok()) {
        config.server.port = port;
    }
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &BotConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }
    if !(1..=50).contains(&config.youtube.max_results) {
        return Err(ConfigError::ValidationError(format!(
            "youtube.max_results must be between 1 and 50, got {}",
            config.youtube.max_results
        )));
    }
    if !(1..=MAX_HOURS_BACK).contains(&config.youtube.hours_back) {
        return Err(ConfigError::ValidationError(format!(
            "youtube.hours_back must be between 1 and {MAX_HOURS_BACK}, got {}",
            config.youtube.hours_back
        )));
    }
    if config.gemini.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "gemini.model must not be empty".to_string(),
        ));
    }
    if config.http.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "http.timeout_secs must be positive".to_string(),
        ));
    }
    if config.http.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "http.max_attempts must be at least 1".to_string(),
        ));
    }
    if config.http.initial_backoff_ms > config.http.max_backoff_ms {
        return Err(ConfigError::ValidationError(format!(
            "http.initial_backoff_ms ({}) exceeds http.max_backoff_ms ({})",
            config.http.initial_backoff_ms, config.http.max_backoff_ms
        )));
    }
    for (name, url) in [
        ("youtube.base_url", &config.youtube.base_url),
        ("gemini.base_url", &config.gemini.base_url),
        ("naver.base_url", &config.naver.base_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be an http(s) URL, got '{url}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn empty_document_uses_defaults() {
        let config = load_config_from_string("").unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.youtube.max_results, 5);
        assert_eq!(config.youtube.hours_back, 24);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.naver.excluded_boards, ["먹거리", "맛집", "프리마켓"]);
        assert!(config.cron_secret.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let yaml = r"
server:
  port: 4100
youtube:
  api_key: yt-key
  max_results: 10
naver:
  excluded_boards: [장터]
http:
  timeout_secs: 5
  max_attempts: 4
  initial_backoff_ms: 100
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.youtube.require_key().unwrap().expose(), "yt-key");
        assert_eq!(config.youtube.max_results, 10);
        assert_eq!(config.naver.excluded_boards, ["장터"]);
        assert_eq!(config.http.timeout(), Duration::from_secs(5));

        let retry = config.http.retry();
        assert_eq!(retry.max_attempts, 4);
        assert_eq!(retry.initial_backoff, Duration::from_millis(100));
    }

    #[test]
    #[allow(clippy::literal_string_with_formatting_args)]
    fn unset_variables_fall_back_to_defaults() {
        let yaml = r"
gemini:
  model: ${MARKETING_TEST_UNSET_MODEL:-gemini-1.5-pro}
  api_key: ${MARKETING_TEST_UNSET_KEY}
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert!(config.gemini.require_key().is_err());
    }

    #[test]
    fn blank_keys_are_missing() {
        let config = load_config_from_string("youtube:\n  api_key: \"  \"\n").unwrap();
        let Err(err) = config.youtube.require_key() else {
            panic!("blank key accepted");
        };
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "YOUTUBE_API_KEY"));
    }

    #[test]
    fn naver_requires_both_credentials() {
        let config = load_config_from_string("naver:\n  client_id: abc\n").unwrap();
        let Err(ConfigError::MissingEnvVar(var)) = config.naver.require_credentials() else {
            panic!("half credentials accepted");
        };
        assert_eq!(var, "NAVER_CLIENT_SECRET");
    }

    #[test]
    fn environment_wins_over_file() {
        let mut config = load_config_from_string("gemini:\n  api_key: from-file\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("GEMINI_API_KEY", "from-env"),
            ("NAVER_CLIENT_ID", "id"),
            ("NAVER_CLIENT_SECRET", "secret"),
            ("YOUTUBE_API_KEY", ""),
            ("MARKETING_BOT_PORT", "8088"),
        ]);
        apply_env_overrides(&mut config, |name| env.get(name).map(ToString::to_string));

        assert_eq!(config.gemini.require_key().unwrap().expose(), "from-env");
        assert!(config.naver.require_credentials().is_ok());
        assert!(config.youtube.require_key().is_err());
        assert_eq!(config.server.port, 8088);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for yaml in [
            "youtube:\n  max_results: 0\n",
            "youtube:\n  hours_back: -1\n",
            "youtube:\n  hours_back: 100000\n",
            "http:\n  max_attempts: 0\n",
            "http:\n  initial_backoff_ms: 20000\n",
            "naver:\n  base_url: openapi.naver.com\n",
        ] {
            let Err(err) = load_config_from_string(yaml) else {
                panic!("accepted invalid config: {yaml}");
            };
            assert!(matches!(err, ConfigError::ValidationError(_)), "{yaml}: {err}");
        }
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = load_config_from_string("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 3999\ncron_secret: shh").unwrap();
        let path = file.path().to_str().unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.server.port, 3999);
        assert!(config.cron_secret.is_some());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let result = load_config(path.to_str());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
