//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing mission events to external systems.

use async_trait::async_trait;

use crate::domain::mission::MissionEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError { message: String },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed { message: String },
}

/// Port for publishing domain events.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish mission events.
    async fn publish_mission_events(
        &self,
        events: Vec<MissionEvent>,
    ) -> Result<(), EventPublishError>;

    /// Publish a single mission event.
    async fn publish_mission_event(&self, event: MissionEvent) -> Result<(), EventPublishError> {
        self.publish_mission_events(vec![event]).await
    }
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_mission_events(
        &self,
        _events: Vec<MissionEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }
}
