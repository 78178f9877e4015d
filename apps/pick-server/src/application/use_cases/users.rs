//! User Use Cases
//!
//! Profiles, ranking, point history and top voters.

use std::sync::Arc;

use crate::application::dto::{PointLogDto, RankingEntryDto, TopVoterDto, UserDto};
use crate::domain::pick::PickRepository;
use crate::domain::shared::{MissionId, UserId};
use crate::domain::user::{CreateUserCommand, User, UserRepository};
use crate::error::{ErrorCode, ServiceError};

/// Default size of the ranking.
pub const DEFAULT_RANKING_LIMIT: usize = 100;
/// Default number of ledger entries returned.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
/// Default number of top voters shown on a mission.
pub const DEFAULT_TOP_VOTERS: usize = 3;

/// Use case for users.
pub struct UsersUseCase {
    users: Arc<dyn UserRepository>,
    picks: Arc<dyn PickRepository>,
}

impl UsersUseCase {
    /// Create a new `UsersUseCase`.
    pub const fn new(users: Arc<dyn UserRepository>, picks: Arc<dyn PickRepository>) -> Self {
        Self { users, picks }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns `CONFLICT` when the ID is taken and `INVALID_REQUEST` for bad fields.
    pub async fn create(&self, cmd: CreateUserCommand) -> Result<UserDto, ServiceError> {
        if let Some(id) = &cmd.id
            && self.users.find_by_id(id).await?.is_some()
        {
            return Err(ServiceError::new(
                ErrorCode::Conflict,
                format!("User {id} already exists"),
            ));
        }
        let user = User::new(cmd)?;
        self.users.save(&user).await?;
        tracing::info!(user_id = %user.id(), "User registered");
        Ok(UserDto::from(&user))
    }

    /// Fetch a user.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for unknown users.
    pub async fn get(&self, id: &UserId) -> Result<UserDto, ServiceError> {
        Ok(UserDto::from(&self.load(id).await?))
    }

    /// Change nickname and/or avatar.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for unknown users and `INVALID_REQUEST` for bad nicknames.
    pub async fn update_profile(
        &self,
        id: &UserId,
        nickname: Option<&str>,
        avatar_url: Option<String>,
    ) -> Result<UserDto, ServiceError> {
        let mut user = self.load(id).await?;
        user.update_profile(nickname, avatar_url)?;
        self.users.save(&user).await?;
        Ok(UserDto::from(&user))
    }

    /// Users by points, highest first.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn ranking(&self, limit: usize) -> Result<Vec<RankingEntryDto>, ServiceError> {
        Ok(self
            .users
            .ranking(limit)
            .await?
            .iter()
            .enumerate()
            .map(|(i, user)| RankingEntryDto {
                rank: i + 1,
                user_id: user.id().to_string(),
                nickname: user.nickname().to_string(),
                points: user.points(),
                tier: user.tier().to_string(),
            })
            .collect())
    }

    /// A user's ledger, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for unknown users.
    pub async fn point_history(
        &self,
        id: &UserId,
        limit: usize,
    ) -> Result<Vec<PointLogDto>, ServiceError> {
        self.load(id).await?;
        Ok(self.users.point_logs(id, limit).await?)
    }

    /// Highest-scoring participants of a mission.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn top_voters(
        &self,
        mission_id: &MissionId,
        limit: usize,
    ) -> Result<Vec<TopVoterDto>, ServiceError> {
        let participants = self.picks.participants(mission_id).await?;
        let mut users = self.users.find_many(&participants).await?;
        users.sort_by(|a, b| b.points().cmp(&a.points()));
        Ok(users
            .iter()
            .take(limit)
            .map(|u| TopVoterDto {
                nickname: u.nickname().to_string(),
                points: u.points(),
                tier: u.tier().to_string(),
            })
            .collect())
    }

    async fn load(&self, id: &UserId) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }
}
