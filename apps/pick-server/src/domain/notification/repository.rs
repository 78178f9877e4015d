//! Notification Repository Trait

use async_trait::async_trait;

use super::notification::{Notification, NotificationPreferences};
use crate::domain::catalog::ShowCategory;
use crate::domain::shared::{DomainError, NotificationId, Timestamp, UserId};

/// Repository for inbox entries and delivery preferences.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store notifications.
    async fn save_all(&self, notifications: &[Notification]) -> Result<(), DomainError>;

    /// A user's notifications, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Mark one notification read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` unless the notification exists and belongs to the user.
    async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), DomainError>;

    /// Mark every notification of a user read. Returns how many changed.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, DomainError>;

    /// Delete read notifications created before `cutoff`. Returns how many went.
    async fn delete_read_before(&self, cutoff: Timestamp) -> Result<usize, DomainError>;

    /// A user's preferences, if set.
    async fn preferences(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreferences>, DomainError>;

    /// Every stored preference record.
    async fn all_preferences(&self) -> Result<Vec<NotificationPreferences>, DomainError>;

    /// Insert or replace a user's preferences.
    async fn save_preferences(&self, prefs: &NotificationPreferences) -> Result<(), DomainError>;

    /// Preference records following a category.
    async fn subscribers(
        &self,
        category: ShowCategory,
    ) -> Result<Vec<NotificationPreferences>, DomainError> {
        Ok(self
            .all_preferences()
            .await?
            .into_iter()
            .filter(|p| p.follows(category))
            .collect())
    }
}
