//! Comments and replies on missions.

use serde::{Deserialize, Serialize};

use crate::domain::scoring::MissionType;
use crate::domain::shared::{CommentId, DomainError, MissionId, ReplyId, Timestamp, UserId};

/// Longest accepted comment or reply.
pub const MAX_CONTENT_CHARS: usize = 500;
/// Shown in place of a deleted comment's content.
pub const DELETED_PLACEHOLDER: &str = "삭제된 댓글입니다.";
/// Returned when someone other than the author deletes.
pub const FORBIDDEN_MESSAGE: &str = "권한이 없습니다.";

fn validate_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::invalid("content", "Content must not be blank"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DomainError::invalid(
            "content",
            format!("Content exceeds {MAX_CONTENT_CHARS} characters"),
        ));
    }
    Ok(content.to_string())
}

fn ensure_author(author: &UserId, user_id: &UserId, action: &str) -> Result<(), DomainError> {
    if author != user_id {
        return Err(DomainError::Forbidden {
            action: action.to_string(),
            message: FORBIDDEN_MESSAGE.to_string(),
        });
    }
    Ok(())
}

/// A top-level comment on a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID.
    pub id: CommentId,
    /// Mission commented on.
    pub mission_id: MissionId,
    /// Mission table.
    pub mission_type: MissionType,
    /// Author.
    pub user_id: UserId,
    /// Text.
    pub content: String,
    /// Likes received.
    pub likes_count: u64,
    /// Replies received.
    pub replies_count: u64,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Posting time.
    pub created_at: Timestamp,
}

impl Comment {
    /// Create a comment with trimmed content.
    pub fn new(
        mission_id: MissionId,
        mission_type: MissionType,
        user_id: UserId,
        content: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: CommentId::generate(),
            mission_id,
            mission_type,
            user_id,
            content: validate_content(content)?,
            likes_count: 0,
            replies_count: 0,
            is_deleted: false,
            created_at: Timestamp::now(),
        })
    }

    /// Soft delete; only the author may.
    pub fn delete(&mut self, user_id: &UserId) -> Result<(), DomainError> {
        ensure_author(&self.user_id, user_id, "delete_comment")?;
        self.is_deleted = true;
        Ok(())
    }

    /// Content as shown to viewers.
    #[must_use]
    pub fn visible_content(&self) -> &str {
        if self.is_deleted {
            DELETED_PLACEHOLDER
        } else {
            &self.content
        }
    }
}

/// A reply under a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Reply ID.
    pub id: ReplyId,
    /// Parent comment.
    pub comment_id: CommentId,
    /// Mission of the parent comment.
    pub mission_id: MissionId,
    /// Author.
    pub user_id: UserId,
    /// Text.
    pub content: String,
    /// Likes received.
    pub likes_count: u64,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Posting time.
    pub created_at: Timestamp,
}

impl Reply {
    /// Create a reply to `parent`.
    pub fn new(parent: &Comment, user_id: UserId, content: &str) -> Result<Self, DomainError> {
        if parent.is_deleted {
            return Err(DomainError::Conflict {
                entity_type: "Comment".to_string(),
                message: "Cannot reply to a deleted comment".to_string(),
            });
        }
        Ok(Self {
            id: ReplyId::generate(),
            comment_id: parent.id.clone(),
            mission_id: parent.mission_id.clone(),
            user_id,
            content: validate_content(content)?,
            likes_count: 0,
            is_deleted: false,
            created_at: Timestamp::now(),
        })
    }

    /// Soft delete; only the author may.
    pub fn delete(&mut self, user_id: &UserId) -> Result<(), DomainError> {
        ensure_author(&self.user_id, user_id, "delete_reply")?;
        self.is_deleted = true;
        Ok(())
    }

    /// Content as shown to viewers.
    #[must_use]
    pub fn visible_content(&self) -> &str {
        if self.is_deleted {
            DELETED_PLACEHOLDER
        } else {
            &self.content
        }
    }
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    /// Whether the user now likes the target.
    pub is_liked: bool,
    /// Likes after the toggle.
    pub likes_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment::new(
            MissionId::new("m"),
            MissionType::Mission1,
            UserId::new("author"),
            "  영수 최고 ",
        )
        .unwrap()
    }

    #[test]
    fn content_is_trimmed_and_bounded() {
        assert_eq!(comment().content, "영수 최고");
        let long = "a".repeat(MAX_CONTENT_CHARS + 1);
        assert!(Comment::new(MissionId::new("m"), MissionType::Mission1, UserId::new("u"), &long).is_err());
        assert!(Comment::new(MissionId::new("m"), MissionType::Mission1, UserId::new("u"), " ").is_err());
    }

    #[test]
    fn only_author_deletes() {
        let mut c = comment();
        let err = c.delete(&UserId::new("other")).unwrap_err();
        assert_eq!(err.to_string(), FORBIDDEN_MESSAGE);
        c.delete(&UserId::new("author")).unwrap();
        assert_eq!(c.visible_content(), DELETED_PLACEHOLDER);
    }

    #[test]
    fn reply_inherits_mission_and_rejects_deleted_parent() {
        let mut parent = comment();
        let reply = Reply::new(&parent, UserId::new("u2"), "동의").unwrap();
        assert_eq!(reply.mission_id, parent.mission_id);
        assert_eq!(reply.comment_id, parent.id);

        parent.delete(&UserId::new("author")).unwrap();
        assert!(Reply::new(&parent, UserId::new("u2"), "늦었다").is_err());
    }
}
