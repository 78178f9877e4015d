//! Event publisher that writes mission events to the log.

use async_trait::async_trait;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::mission::MissionEvent;

/// Publishes mission events as structured log lines.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventPublisher;

#[async_trait]
impl EventPublisherPort for LoggingEventPublisher {
    async fn publish_mission_events(
        &self,
        events: Vec<MissionEvent>,
    ) -> Result<(), EventPublishError> {
        for event in events {
            let payload = serde_json::to_string(&event).map_err(|e| {
                EventPublishError::SerializationError {
                    message: e.to_string(),
                }
            })?;
            tracing::info!(
                event_type = event.event_type(),
                mission_id = %event.mission_id(),
                payload = %payload,
                "Mission event"
            );
        }
        Ok(())
    }
}
