//! In-app notifications and per-user delivery preferences.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::ShowCategory;
use crate::domain::shared::{MissionId, NotificationId, Timestamp, UserId};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// A mission was published.
    NewMission,
    /// A mission the user joined closed.
    MissionClosed,
    /// Operator message.
    System,
}

/// An inbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification ID.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Kind.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Related mission.
    pub mission_id: Option<MissionId>,
    /// Author of the related mission.
    pub creator_id: Option<UserId>,
    /// Whether the recipient opened it.
    pub is_read: bool,
    /// Creation time.
    pub created_at: Timestamp,
}

impl Notification {
    /// New unread notification.
    pub fn new(
        user_id: UserId,
        kind: NotificationType,
        title: impl Into<String>,
        content: impl Into<String>,
        mission_id: Option<MissionId>,
        creator_id: Option<UserId>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            user_id,
            kind,
            title: title.into(),
            content: content.into(),
            mission_id,
            creator_id,
            is_read: false,
            created_at: Timestamp::now(),
        }
    }
}

/// Email delivery preferences. Users without a record get every email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    /// Owner.
    pub user_id: UserId,
    /// New-mission and digest emails.
    pub email_enabled: bool,
    /// Deadline emails for joined missions.
    pub deadline_email_enabled: bool,
    /// Categories the user wants new-mission emails for.
    pub categories: Vec<ShowCategory>,
}

impl NotificationPreferences {
    /// Defaults for a user: everything on, no category subscriptions.
    #[must_use]
    pub const fn defaults_for(user_id: UserId) -> Self {
        Self {
            user_id,
            email_enabled: true,
            deadline_email_enabled: true,
            categories: Vec::new(),
        }
    }

    /// Whether the user follows a category.
    #[must_use]
    pub fn follows(&self, category: ShowCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Whether email of a kind should go out given optional preferences.
#[must_use]
pub fn email_allowed(prefs: Option<&NotificationPreferences>, deadline: bool) -> bool {
    prefs.is_none_or(|p| {
        if deadline {
            p.deadline_email_enabled
        } else {
            p.email_enabled
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_preferences_allow_email() {
        assert!(email_allowed(None, false));
        assert!(email_allowed(None, true));
    }

    #[test]
    fn preferences_gate_each_kind() {
        let mut prefs = NotificationPreferences::defaults_for(UserId::new("u"));
        prefs.deadline_email_enabled = false;
        assert!(email_allowed(Some(&prefs), false));
        assert!(!email_allowed(Some(&prefs), true));
    }

    #[test]
    fn notification_type_serializes_screaming() {
        let n = Notification::new(
            UserId::new("u"),
            NotificationType::MissionClosed,
            "t",
            "c",
            None,
            None,
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "MISSION_CLOSED");
        assert_eq!(json["is_read"], false);
    }
}
