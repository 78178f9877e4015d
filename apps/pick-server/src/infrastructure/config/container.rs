//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use axum::Router;

use crate::application::ports::{
    EmailError, EmailSenderPort, EventPublisherPort, LogOnlyEmailSender, MarketingBotError,
    MarketingBotPort,
};
use crate::application::use_cases::{
    CommentsUseCase, CronJobsUseCase, DistributePointsUseCase, MissionsUseCase,
    NotificationSettings, NotificationsUseCase, ResultsUseCase, SendMissionNotificationUseCase,
    SettleMissionUseCase, SubmitPickUseCase, UsersUseCase,
};
use crate::domain::comment::CommentRepository;
use crate::domain::mission::MissionRepository;
use crate::domain::notification::NotificationRepository;
use crate::domain::pick::PickRepository;
use crate::domain::user::UserRepository;
use crate::infrastructure::email::ResendEmailSender;
use crate::infrastructure::events::LoggingEventPublisher;
use crate::infrastructure::health::HealthState;
use crate::infrastructure::http::{AppState, create_router};
use crate::infrastructure::marketing_bot::MarketingBotClient;
use crate::infrastructure::persistence::{
    InMemoryCommentRepository, InMemoryMissionRepository, InMemoryNotificationRepository,
    InMemoryPickRepository, InMemoryUserRepository,
};

use super::settings::ServerConfig;

/// Error building the container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The email client could not be built.
    #[error("email sender: {0}")]
    Email(#[from] EmailError),
    /// The marketing bot client could not be built.
    #[error("marketing bot client: {0}")]
    MarketingBot(#[from] MarketingBotError),
}

/// Dependency injection container.
///
/// Holds the repositories and outbound adapters and builds use cases from them.
pub struct Container {
    config: ServerConfig,
    missions: Arc<dyn MissionRepository>,
    picks: Arc<dyn PickRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    notifications: Arc<dyn NotificationRepository>,
    email: Arc<dyn EmailSenderPort>,
    marketing_bot: Arc<dyn MarketingBotPort>,
    event_publisher: Arc<dyn EventPublisherPort>,
}

impl Container {
    /// Wire the production adapters described by `config`.
    ///
    /// Email goes through Resend when an API key is set and is only logged otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn from_config(config: ServerConfig) -> Result<Self, ContainerError> {
        let email: Arc<dyn EmailSenderPort> = match &config.email.api_key {
            Some(key) => Arc::new(ResendEmailSender::new(
                key.clone(),
                config.email.from_email.as_deref(),
                config.email.timeout,
                config.retry.clone(),
            )?),
            None => {
                tracing::warn!("RESEND_API_KEY not set, emails will only be logged");
                Arc::new(LogOnlyEmailSender)
            }
        };
        let marketing_bot = Arc::new(MarketingBotClient::new(
            &config.marketing_bot.base_url,
            config.cron_secret.clone(),
            config.marketing_bot.timeout,
            config.retry.clone(),
        )?);

        Ok(Self::with_adapters(config, email, marketing_bot))
    }

    /// Wire in-memory repositories around the given outbound adapters.
    #[must_use]
    pub fn with_adapters(
        config: ServerConfig,
        email: Arc<dyn EmailSenderPort>,
        marketing_bot: Arc<dyn MarketingBotPort>,
    ) -> Self {
        Self {
            config,
            missions: Arc::new(InMemoryMissionRepository::new()),
            picks: Arc::new(InMemoryPickRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            email,
            marketing_bot,
            event_publisher: Arc::new(LoggingEventPublisher),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the mission repository.
    #[must_use]
    pub fn missions(&self) -> Arc<dyn MissionRepository> {
        Arc::clone(&self.missions)
    }

    /// Get the user repository.
    #[must_use]
    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::clone(&self.users)
    }

    /// Get the notification repository.
    #[must_use]
    pub fn notifications(&self) -> Arc<dyn NotificationRepository> {
        Arc::clone(&self.notifications)
    }

    fn distribute_points(&self) -> Arc<DistributePointsUseCase> {
        Arc::new(DistributePointsUseCase::new(
            Arc::clone(&self.missions),
            Arc::clone(&self.picks),
            Arc::clone(&self.users),
        ))
    }

    /// Create the mission notification dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> Arc<SendMissionNotificationUseCase> {
        Arc::new(SendMissionNotificationUseCase::new(
            Arc::clone(&self.users),
            Arc::clone(&self.picks),
            Arc::clone(&self.notifications),
            Arc::clone(&self.email),
            NotificationSettings::new(&self.config.site_url, self.config.email.send_interval),
        ))
    }

    /// Build the handler state with every use case.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        let distributor = self.distribute_points();
        let results = Arc::new(ResultsUseCase::new(
            Arc::clone(&self.missions),
            Arc::clone(&self.picks),
            Arc::clone(&distributor),
            Arc::clone(&self.event_publisher),
        ));
        let notifications = Arc::new(NotificationsUseCase::new(Arc::clone(&self.notifications)));
        let dispatcher = self.dispatcher();
        let cron = Arc::new(CronJobsUseCase::new(
            Arc::clone(&self.missions),
            Arc::clone(&results),
            Arc::clone(&dispatcher),
            Arc::clone(&notifications),
            Arc::clone(&self.marketing_bot),
            Arc::clone(&self.event_publisher),
        ));

        AppState {
            missions: Arc::new(MissionsUseCase::new(
                Arc::clone(&self.missions),
                Arc::clone(&self.users),
                Arc::clone(&self.event_publisher),
            )),
            picks: Arc::new(SubmitPickUseCase::new(
                Arc::clone(&self.missions),
                Arc::clone(&self.picks),
                Arc::clone(&self.users),
            )),
            results,
            settlement: Arc::new(SettleMissionUseCase::new(
                Arc::clone(&self.missions),
                distributor,
                Arc::clone(&self.event_publisher),
            )),
            users: Arc::new(UsersUseCase::new(
                Arc::clone(&self.users),
                Arc::clone(&self.picks),
            )),
            comments: Arc::new(CommentsUseCase::new(
                Arc::clone(&self.comments),
                Arc::clone(&self.missions),
                Arc::clone(&self.users),
            )),
            notifications,
            dispatcher,
            cron,
            cron_secret: self.config.cron_secret.clone(),
        }
    }

    /// Build the health endpoint state.
    #[must_use]
    pub fn health_state(&self) -> Arc<HealthState> {
        Arc::new(HealthState::new(
            env!("CARGO_PKG_VERSION"),
            self.email.is_enabled(),
            self.config.cron_secret.is_some(),
            Arc::clone(&self.missions),
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
    use crate::infrastructure::config::Secret;

    #[test]
    fn logs_email_without_api_key() {
        let container = Container::from_config(ServerConfig::default()).unwrap();
        assert!(!container.email.is_enabled());
        assert_eq!(
            container.dispatcher().settings().base_url(),
            "https://real-pick.com"
        );
    }

    #[test]
    fn uses_resend_with_api_key() {
        let mut config = ServerConfig::default();
        config.email.api_key = Some(Secret::new("re_test".to_string()));
        let container = Container::from_config(config).unwrap();
        assert!(container.email.is_enabled());
    }

    #[test]
    fn blank_marketing_bot_url_fails() {
        let mut config = ServerConfig::default();
        config.marketing_bot.base_url = "  ".to_string();
        assert!(matches!(
            Container::from_config(config),
            Err(ContainerError::MarketingBot(_))
        ));
    }
}
