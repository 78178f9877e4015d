//! Comment Repository Trait

use std::collections::HashSet;

use async_trait::async_trait;

use super::comment::{Comment, LikeToggle, Reply};
use crate::domain::shared::{CommentId, DomainError, MissionId, ReplyId, UserId};

/// Repository for comments, replies and their likes.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Save a comment (insert or update).
    async fn save_comment(&self, comment: &Comment) -> Result<(), DomainError>;

    /// Find a comment.
    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, DomainError>;

    /// Comments on a mission, oldest first.
    async fn list_comments(&self, mission_id: &MissionId) -> Result<Vec<Comment>, DomainError>;

    /// Insert a reply and bump the parent's reply count in one step.
    async fn add_reply(&self, reply: &Reply) -> Result<(), DomainError>;

    /// Save a reply (update).
    async fn save_reply(&self, reply: &Reply) -> Result<(), DomainError>;

    /// Find a reply.
    async fn find_reply(&self, id: &ReplyId) -> Result<Option<Reply>, DomainError>;

    /// Replies under the given comments, oldest first.
    async fn list_replies(&self, comment_ids: &[CommentId]) -> Result<Vec<Reply>, DomainError>;

    /// Like or unlike a comment.
    async fn toggle_comment_like(
        &self,
        id: &CommentId,
        user_id: &UserId,
    ) -> Result<LikeToggle, DomainError>;

    /// Like or unlike a reply.
    async fn toggle_reply_like(
        &self,
        id: &ReplyId,
        user_id: &UserId,
    ) -> Result<LikeToggle, DomainError>;

    /// IDs among `target_ids` (comments or replies) the user liked.
    async fn liked_by(
        &self,
        user_id: &UserId,
        target_ids: &[String],
    ) -> Result<HashSet<String>, DomainError>;
}
