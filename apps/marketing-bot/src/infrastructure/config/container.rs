//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use axum::Router;

use crate::application::ports::{
    CafeSearchPort, GeminiError, LlmPort, NaverError, YouTubeError, YouTubePort,
};
use crate::application::use_cases::{
    CollectVideosUseCase, DailyAutoMissionUseCase, DraftReviewUseCase, MissionDraftsUseCase,
    NaverCafeSyncUseCase,
};
use crate::domain::cafe::{CafePostRepository, ProgressRepository};
use crate::domain::draft::DraftRepository;
use crate::domain::video::{ChannelRepository, VideoRepository};
use crate::infrastructure::gemini::GeminiClient;
use crate::infrastructure::health::{HealthState, IntegrationStatus};
use crate::infrastructure::http::{AppState, create_router};
use crate::infrastructure::naver::NaverCafeClient;
use crate::infrastructure::persistence::{
    InMemoryCafePostRepository, InMemoryChannelRepository, InMemoryDraftRepository,
    InMemoryProgressRepository, InMemoryVideoRepository,
};
use crate::infrastructure::youtube::YouTubeClient;

use super::BotConfig;

/// Error building the container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The YouTube client could not be built.
    #[error("youtube client: {0}")]
    YouTube(#[from] YouTubeError),
    /// The Gemini client could not be built.
    #[error("gemini client: {0}")]
    Gemini(#[from] GeminiError),
    /// The Naver client could not be built.
    #[error("naver client: {0}")]
    Naver(#[from] NaverError),
}

/// Outbound API adapters.
pub struct Adapters {
    /// Video search.
    pub youtube: Arc<dyn YouTubePort>,
    /// Text generation.
    pub llm: Arc<dyn LlmPort>,
    /// Cafe search.
    pub cafe_search: Arc<dyn CafeSearchPort>,
    /// Which adapters have credentials.
    pub integrations: IntegrationStatus,
}

/// Dependency injection container.
///
/// Holds the repositories and outbound adapters and builds use cases from them.
pub struct Container {
    config: BotConfig,
    adapters: Adapters,
    videos: Arc<dyn VideoRepository>,
    channels: Arc<dyn ChannelRepository>,
    drafts: Arc<dyn DraftRepository>,
    posts: Arc<dyn CafePostRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl Container {
    /// Wire the production adapters described by `config`.
    ///
    /// An API without credentials is still wired; its calls fail with
    /// `NOT_CONFIGURED`.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn from_config(config: BotConfig) -> Result<Self, ContainerError> {
        let timeout = config.http.timeout();
        let retry = config.http.retry();

        let youtube_key = match config.youtube.require_key() {
            Ok(key) => Some(key.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "YouTube crawl disabled");
                None
            }
        };
        let gemini_key = match config.gemini.require_key() {
            Ok(key) => Some(key.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "Gemini screening and drafts disabled");
                None
            }
        };
        let naver_credentials = match config.naver.require_credentials() {
            Ok((id, secret)) => Some((id.clone(), secret.clone())),
            Err(e) => {
                tracing::warn!(error = %e, "Naver cafe sync disabled");
                None
            }
        };

        let youtube = YouTubeClient::new(
            youtube_key,
            &config.youtube.base_url,
            timeout,
            retry.clone(),
        )?;
        let gemini = GeminiClient::new(
            gemini_key,
            &config.gemini.base_url,
            config.gemini.model.clone(),
            timeout,
            retry.clone(),
        )?;
        let naver = NaverCafeClient::new(naver_credentials, &config.naver.base_url, timeout, retry)?;

        let adapters = Adapters {
            integrations: IntegrationStatus {
                youtube: youtube.is_configured(),
                gemini: gemini.is_configured(),
                naver: naver.is_configured(),
                cron_secret: config.cron_secret.is_some(),
            },
            youtube: Arc::new(youtube),
            llm: Arc::new(gemini),
            cafe_search: Arc::new(naver),
        };
        Ok(Self::with_adapters(config, adapters))
    }

    /// Wire in-memory repositories around the given outbound adapters.
    #[must_use]
    pub fn with_adapters(config: BotConfig, adapters: Adapters) -> Self {
        Self {
            config,
            adapters,
            videos: Arc::new(InMemoryVideoRepository::new()),
            channels: Arc::new(InMemoryChannelRepository::new()),
            drafts: Arc::new(InMemoryDraftRepository::new()),
            posts: Arc::new(InMemoryCafePostRepository::new()),
            progress: Arc::new(InMemoryProgressRepository::new()),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Build the handler state with every use case.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        let collector = Arc::new(CollectVideosUseCase::new(
            Arc::clone(&self.adapters.youtube),
            Arc::clone(&self.videos),
            Arc::clone(&self.channels),
        ));
        let drafts = Arc::new(MissionDraftsUseCase::new(
            Arc::clone(&self.adapters.llm),
            Arc::clone(&self.drafts),
        ));

        AppState {
            daily: Arc::new(DailyAutoMissionUseCase::new(
                Arc::clone(&collector),
                Arc::clone(&drafts),
                self.config.youtube.max_results,
                self.config.youtube.hours_back,
            )),
            collector,
            drafts,
            review: Arc::new(DraftReviewUseCase::new(Arc::clone(&self.drafts))),
            cafe: Arc::new(NaverCafeSyncUseCase::new(
                Arc::clone(&self.adapters.cafe_search),
                Arc::clone(&self.adapters.llm),
                Arc::clone(&self.posts),
                Arc::clone(&self.progress),
                self.config.naver.excluded_boards.clone(),
            )),
            cron_secret: self.config.cron_secret.clone(),
        }
    }

    /// Build the health endpoint state.
    #[must_use]
    pub fn health_state(&self) -> Arc<HealthState> {
        Arc::new(HealthState::new(
            env!("CARGO_PKG_VERSION"),
            self.adapters.integrations,
        ))
    }

    /// Build the complete HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(self.app_state(), self.health_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pick_server::infrastructure::config::Secret;

    #[test]
    fn unconfigured_apis_are_still_wired() {
        let container = Container::from_config(BotConfig::default()).unwrap();
        let integrations = container.adapters.integrations;
        assert!(!integrations.youtube);
        assert!(!integrations.gemini);
        assert!(!integrations.naver);
    }

    #[test]
    fn configured_keys_are_reported() {
        let mut config = BotConfig::default();
        config.gemini.api_key = Some(Secret::new("gm".to_string()));
        config.naver.client_id = Some(Secret::new("id".to_string()));
        config.naver.client_secret = Some(Secret::new("secret".to_string()));
        let container = Container::from_config(config).unwrap();

        let integrations = container.adapters.integrations;
        assert!(integrations.gemini);
        assert!(integrations.naver);
        assert!(!integrations.youtube);
    }
}
