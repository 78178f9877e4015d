//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod comments;
mod cron_jobs;
mod distribute_points;
mod missions;
mod notifications;
mod results;
mod send_mission_notification;
mod settle_mission;
mod submit_pick;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use comments::{CommentsUseCase, UNKNOWN_NICKNAME, UNKNOWN_TIER};
pub use cron_jobs::{CronJobsUseCase, infer_slot, slot_window};
pub use distribute_points::DistributePointsUseCase;
pub use missions::MissionsUseCase;
pub use notifications::{
    DEFAULT_INBOX_LIMIT, NotificationsUseCase, PreferencesUpdate, READ_RETENTION_DAYS,
};
pub use results::ResultsUseCase;
pub use send_mission_notification::{
    DEFAULT_SITE_URL, NotificationSettings, SendMissionNotificationUseCase, USER_CHUNK_SIZE,
    display_category,
};
pub use settle_mission::SettleMissionUseCase;
pub use submit_pick::SubmitPickUseCase;
pub use users::{DEFAULT_HISTORY_LIMIT, DEFAULT_RANKING_LIMIT, DEFAULT_TOP_VOTERS, UsersUseCase};
