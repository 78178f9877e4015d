//! Mission Use Cases
//!
//! Create, fetch and list missions.

use std::sync::Arc;

use crate::application::dto::MissionDto;
use crate::application::ports::EventPublisherPort;
use crate::domain::mission::{CreateMissionCommand, Mission, MissionFilter, MissionRepository};
use crate::domain::shared::{MissionId, Timestamp};
use crate::domain::user::UserRepository;
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Use case for mission creation and queries.
pub struct MissionsUseCase {
    missions: Arc<dyn MissionRepository>,
    users: Arc<dyn UserRepository>,
    event_publisher: Arc<dyn EventPublisherPort>,
}

impl MissionsUseCase {
    /// Create a new `MissionsUseCase`.
    pub const fn new(
        missions: Arc<dyn MissionRepository>,
        users: Arc<dyn UserRepository>,
        event_publisher: Arc<dyn EventPublisherPort>,
    ) -> Self {
        Self {
            missions,
            users,
            event_publisher,
        }
    }

    /// Create a mission.
    ///
    /// # Errors
    ///
    /// Returns error if the creator is unknown or the command is invalid.
    pub async fn create(&self, cmd: CreateMissionCommand) -> Result<MissionDto, ServiceError> {
        let now = Timestamp::now();

        // 1. Creator must exist
        if self.users.find_by_id(&cmd.creator_id).await?.is_none() {
            return Err(ServiceError::not_found("User", &cmd.creator_id));
        }

        // 2. Build the aggregate
        let mut mission = Mission::create(cmd, now)?;

        // 3. Persist
        self.missions.save(&mut mission).await?;
        metrics::record_mission_created(&mission.form().to_string());

        // 4. Publish events
        let events = mission.drain_events();
        if let Err(e) = self.event_publisher.publish_mission_events(events).await {
            tracing::error!("Failed to publish mission events: {}", e);
        }

        tracing::info!(
            mission_id = %mission.id(),
            form = %mission.form(),
            category = %mission.category(),
            "Mission created"
        );
        Ok(MissionDto::from_mission(&mission, now))
    }

    /// Fetch one mission.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the mission does not exist.
    pub async fn get(&self, id: &MissionId) -> Result<MissionDto, ServiceError> {
        let mission = self.load(id).await?;
        Ok(MissionDto::from_mission(&mission, Timestamp::now()))
    }

    /// List missions, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn list(&self, filter: &MissionFilter) -> Result<Vec<MissionDto>, ServiceError> {
        let now = Timestamp::now();
        Ok(self
            .missions
            .list(filter)
            .await?
            .iter()
            .map(|m| MissionDto::from_mission(m, now))
            .collect())
    }

    async fn load(&self, id: &MissionId) -> Result<Mission, ServiceError> {
        self.missions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mission", id))
    }
}
