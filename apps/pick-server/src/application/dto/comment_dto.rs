//! Comment DTOs.

use serde::Serialize;

use crate::domain::shared::Timestamp;

/// Reply as shown under a comment.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyDto {
    /// Reply ID.
    pub id: String,
    /// Parent comment.
    pub comment_id: String,
    /// Author.
    pub user_id: String,
    /// Author nickname.
    pub nickname: String,
    /// Author tier.
    pub tier: String,
    /// Visible content.
    pub content: String,
    /// Likes.
    pub likes_count: u64,
    /// Whether the viewer liked it.
    pub is_liked: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Posting time.
    pub created_at: Timestamp,
}

/// Comment with its replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDto {
    /// Comment ID.
    pub id: String,
    /// Mission.
    pub mission_id: String,
    /// Author.
    pub user_id: String,
    /// Author nickname.
    pub nickname: String,
    /// Author tier.
    pub tier: String,
    /// Visible content.
    pub content: String,
    /// Likes.
    pub likes_count: u64,
    /// Replies.
    pub replies_count: u64,
    /// Whether the viewer liked it.
    pub is_liked: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Posting time.
    pub created_at: Timestamp,
    /// Replies, oldest first.
    pub replies: Vec<ReplyDto>,
}
