//! Notification Inbox Use Cases

use std::sync::Arc;

use chrono::Duration;

use crate::domain::catalog::ShowCategory;
use crate::domain::notification::{
    Notification, NotificationPreferences, NotificationRepository,
};
use crate::domain::shared::{NotificationId, Timestamp, UserId};
use crate::error::ServiceError;

/// Default number of inbox entries returned.
pub const DEFAULT_INBOX_LIMIT: usize = 20;
/// Read notifications older than this are pruned.
pub const READ_RETENTION_DAYS: i64 = 30;

/// Preference changes; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    /// New-mission email toggle.
    pub email_enabled: Option<bool>,
    /// Deadline email toggle.
    pub deadline_email_enabled: Option<bool>,
    /// Followed categories.
    pub categories: Option<Vec<ShowCategory>>,
}

/// Use case for a user's inbox and delivery preferences.
pub struct NotificationsUseCase {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationsUseCase {
    /// Create a new `NotificationsUseCase`.
    pub const fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// A user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn list(&self, user_id: &UserId, limit: usize) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.notifications.list_for_user(user_id, limit).await?)
    }

    /// Mark one notification read.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` unless the notification belongs to the user.
    pub async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), ServiceError> {
        Ok(self.notifications.mark_read(id, user_id).await?)
    }

    /// Mark all of a user's notifications read. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, ServiceError> {
        Ok(self.notifications.mark_all_read(user_id).await?)
    }

    /// Delete read notifications older than the retention window.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn prune_read(&self, now: Timestamp) -> Result<usize, ServiceError> {
        let cutoff = now.plus(-Duration::days(READ_RETENTION_DAYS));
        let removed = self.notifications.delete_read_before(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, "Pruned read notifications");
        }
        Ok(removed)
    }

    /// Stored preferences, or the all-enabled defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn preferences(&self, user_id: &UserId) -> Result<NotificationPreferences, ServiceError> {
        Ok(self
            .notifications
            .preferences(user_id)
            .await?
            .unwrap_or_else(|| NotificationPreferences::defaults_for(user_id.clone())))
    }

    /// Apply a preference change.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn update_preferences(
        &self,
        user_id: &UserId,
        update: PreferencesUpdate,
    ) -> Result<NotificationPreferences, ServiceError> {
        let mut prefs = self.preferences(user_id).await?;
        if let Some(enabled) = update.email_enabled {
            prefs.email_enabled = enabled;
        }
        if let Some(enabled) = update.deadline_email_enabled {
            prefs.deadline_email_enabled = enabled;
        }
        if let Some(categories) = update.categories {
            prefs.categories.clear();
            for category in categories {
                if !prefs.categories.contains(&category) {
                    prefs.categories.push(category);
                }
            }
        }
        self.notifications.save_preferences(&prefs).await?;
        Ok(prefs)
    }
}
