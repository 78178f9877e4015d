//! Mission Repository Trait

use async_trait::async_trait;

use super::aggregate::Mission;
use super::value_objects::{MissionForm, MissionStatus};
use crate::domain::shared::{DomainError, MissionId, Timestamp};

/// Attempts `update_mission` makes before giving up on a contended mission.
pub const SAVE_ATTEMPTS: usize = 3;

/// Filter for listing missions.
#[derive(Debug, Clone, Default)]
pub struct MissionFilter {
    /// Only missions with this stored status.
    pub status: Option<MissionStatus>,
    /// Only missions of this form.
    pub form: Option<MissionForm>,
    /// Only missions about this show.
    pub show_id: Option<String>,
    /// Only missions created at or after this time.
    pub created_from: Option<Timestamp>,
    /// Only missions created before this time.
    pub created_until: Option<Timestamp>,
}

impl MissionFilter {
    /// Whether a mission passes the filter.
    #[must_use]
    pub fn matches(&self, mission: &Mission) -> bool {
        self.status.is_none_or(|s| mission.status() == s)
            && self.form.is_none_or(|f| mission.form() == f)
            && self
                .show_id
                .as_deref()
                .is_none_or(|id| mission.show_id() == Some(id))
            && self
                .created_from
                .is_none_or(|from| mission.created_at() >= from)
            && self
                .created_until
                .is_none_or(|until| mission.created_at() < until)
    }
}

/// Repository trait for Mission persistence.
///
/// This is a domain interface (port) implemented by infrastructure adapters.
#[async_trait]
pub trait MissionRepository: Send + Sync {
    /// Save a mission (insert or update) and advance its version.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` if the stored mission was saved since
    /// `mission` was loaded, or another error if persistence fails.
    async fn save(&self, mission: &mut Mission) -> Result<(), DomainError>;

    /// Find a mission by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: &MissionId) -> Result<Option<Mission>, DomainError>;

    /// List missions matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self, filter: &MissionFilter) -> Result<Vec<Mission>, DomainError>;
}

/// Load a mission, apply `change` and save it.
///
/// When another writer saved the mission in between, the fresh state is
/// loaded and `change` runs again on it. Returns `None` for an unknown
/// mission.
///
/// # Errors
///
/// Returns the first error of `change`, or `DomainError::Conflict` once
/// `SAVE_ATTEMPTS` saves lost the race.
pub async fn update_mission<T, E, F>(
    missions: &dyn MissionRepository,
    id: &MissionId,
    mut change: F,
) -> Result<Option<(Mission, T)>, E>
where
    F: FnMut(&mut Mission) -> Result<T, E> + Send,
    E: From<DomainError>,
{
    let mut attempt = 1;
    loop {
        let Some(mut mission) = missions.find_by_id(id).await? else {
            return Ok(None);
        };
        let output = change(&mut mission)?;
        match missions.save(&mut mission).await {
            Ok(()) => return Ok(Some((mission, output))),
            Err(DomainError::Conflict { .. }) if attempt < SAVE_ATTEMPTS => {
                tracing::debug!(mission_id = %id, attempt, "Mission changed concurrently, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
