//! HTTP client for the marketing bot service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{AutoMissionSummary, MarketingBotError, MarketingBotPort};
use crate::infrastructure::config::Secret;
use crate::infrastructure::retry::{RetryConfig, RetryError, send_with_retry};

const RUN_DAILY_PATH: &str = "/api/youtube/run-daily-auto-mission";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunDailyRequest<'a> {
    keywords: &'a [String],
    base_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

/// Client of the marketing bot's HTTP API.
#[derive(Debug, Clone)]
pub struct MarketingBotClient {
    client: Client,
    base_url: String,
    cron_secret: Option<Secret>,
    retry: RetryConfig,
}

impl MarketingBotClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is blank or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        cron_secret: Option<Secret>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, MarketingBotError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(MarketingBotError::NotConfigured(
                "MARKETING_BOT_API_URL".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketingBotError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            cron_secret,
            retry,
        })
    }
}

#[async_trait]
impl MarketingBotPort for MarketingBotClient {
    async fn run_daily_auto_mission(
        &self,
        keywords: &[String],
        base_url: &str,
    ) -> Result<AutoMissionSummary, MarketingBotError> {
        let url = format!("{}{RUN_DAILY_PATH}", self.base_url);
        let body = RunDailyRequest { keywords, base_url };
        let response = send_with_retry(
            "marketing_bot",
            &self.retry,
            || {
                let request = self.client.post(&url).json(&body);
                match &self.cron_secret {
                    Some(secret) => request.bearer_auth(secret.expose()),
                    None => request,
                }
            },
            // A timed-out run may still be working; do not start a second one.
            |e| !e.is_timeout(),
        )
        .await
        .map_err(|e| match e {
            RetryError::Transport(e) => MarketingBotError::Transport {
                message: e.to_string(),
            },
            RetryError::Status { status, body } => MarketingBotError::Upstream {
                status: status.as_u16(),
                message: serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error)
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(body),
            },
        })?;

        response
            .json::<AutoMissionSummary>()
            .await
            .map_err(|e| MarketingBotError::Transport {
                message: e.to_string(),
            })
    }
}
