//! Marketing Bot Port (Driven Port)
//!
//! Triggers the daily crawl-and-draft run on the marketing bot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Marketing bot call error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketingBotError {
    /// Required configuration is missing.
    #[error("Marketing bot not configured: {0}")]
    NotConfigured(String),

    /// The bot answered with a non-success status.
    #[error("Marketing bot returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Transport failed.
    #[error("Marketing bot request failed: {message}")]
    Transport { message: String },
}

/// Totals reported by a daily auto-mission run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoMissionSummary {
    /// Videos collected.
    #[serde(default)]
    pub total_collected: u64,
    /// Videos that passed screening.
    #[serde(default)]
    pub total_screened: u64,
    /// Mission drafts created.
    #[serde(default)]
    pub total_missions_created: u64,
}

/// Port for the marketing bot service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketingBotPort: Send + Sync {
    /// Run the daily crawl, screen and draft pipeline for `keywords`.
    async fn run_daily_auto_mission(
        &self,
        keywords: &[String],
        base_url: &str,
    ) -> Result<AutoMissionSummary, MarketingBotError>;
}
