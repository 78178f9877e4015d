//! User Repository Trait

use async_trait::async_trait;

use super::user::User;
use crate::domain::scoring::PointLog;
use crate::domain::shared::{DomainError, UserId};

/// Repository for users and their point ledger.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a user (insert or update).
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find several users at once; unknown IDs are skipped.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Users with an email address.
    async fn list_with_email(&self) -> Result<Vec<User>, DomainError>;

    /// Users by points, highest first.
    async fn ranking(&self, limit: usize) -> Result<Vec<User>, DomainError>;

    /// Record a ledger entry and apply it to the user's points in one step.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    async fn apply_point_log(&self, log: PointLog) -> Result<User, DomainError>;

    /// A user's ledger, newest first.
    async fn point_logs(&self, user_id: &UserId, limit: usize)
    -> Result<Vec<PointLog>, DomainError>;
}
