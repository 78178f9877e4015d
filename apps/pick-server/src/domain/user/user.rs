//! RealPick user profile with points and tier.

use serde::{Deserialize, Serialize};

use crate::domain::scoring::{apply_diff, lowest_tier, tier_for};
use crate::domain::shared::{DomainError, Timestamp, UserId};

/// Longest accepted nickname.
pub const MAX_NICKNAME_CHARS: usize = 20;

/// Command to register a user.
#[derive(Debug, Clone, Default)]
pub struct CreateUserCommand {
    /// Externally assigned ID; generated when absent.
    pub id: Option<UserId>,
    /// Contact email.
    pub email: Option<String>,
    /// Display name.
    pub nickname: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

/// A viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: Option<String>,
    nickname: String,
    avatar_url: Option<String>,
    points: u64,
    tier: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

fn validate_nickname(nickname: &str) -> Result<String, DomainError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(DomainError::invalid("nickname", "Nickname must not be blank"));
    }
    if nickname.chars().count() > MAX_NICKNAME_CHARS {
        return Err(DomainError::invalid(
            "nickname",
            format!("Nickname exceeds {MAX_NICKNAME_CHARS} characters"),
        ));
    }
    Ok(nickname.to_string())
}

fn validate_email(email: Option<String>) -> Result<Option<String>, DomainError> {
    match email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        Some(email) if !email.contains('@') => {
            Err(DomainError::invalid("email", format!("Not an email address: {email}")))
        }
        other => Ok(other),
    }
}

impl User {
    /// Register a user with zero points.
    pub fn new(cmd: CreateUserCommand) -> Result<Self, DomainError> {
        let now = Timestamp::now();
        Ok(Self {
            id: cmd.id.unwrap_or_else(UserId::generate),
            email: validate_email(cmd.email)?,
            nickname: validate_nickname(&cmd.nickname)?,
            avatar_url: cmd.avatar_url,
            points: 0,
            tier: lowest_tier().name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// User ID.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Display name.
    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Avatar image URL.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Accumulated points.
    #[must_use]
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Tier name for the current points.
    #[must_use]
    pub fn tier(&self) -> &str {
        &self.tier
    }

    /// Registration time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Apply a signed point change, clamping at zero and refreshing the tier.
    pub fn apply_points(&mut self, diff: i64) {
        self.points = apply_diff(self.points, diff);
        self.tier = tier_for(self.points).name.to_string();
        self.updated_at = Timestamp::now();
    }

    /// Change nickname and/or avatar.
    pub fn update_profile(
        &mut self,
        nickname: Option<&str>,
        avatar_url: Option<String>,
    ) -> Result<(), DomainError> {
        if let Some(nickname) = nickname {
            self.nickname = validate_nickname(nickname)?;
        }
        if avatar_url.is_some() {
            self.avatar_url = avatar_url;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
