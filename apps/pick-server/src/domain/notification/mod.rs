//! Notification Bounded Context

pub mod notification;
pub mod repository;

pub use notification::{Notification, NotificationPreferences, NotificationType, email_allowed};
pub use repository::NotificationRepository;
