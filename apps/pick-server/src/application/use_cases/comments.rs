//! Comment Use Cases

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::dto::{CommentDto, ReplyDto};
use crate::domain::comment::{Comment, CommentRepository, LikeToggle, Reply};
use crate::domain::mission::MissionRepository;
use crate::domain::scoring::MissionType;
use crate::domain::shared::{CommentId, MissionId, ReplyId, UserId};
use crate::domain::user::{User, UserRepository};
use crate::error::ServiceError;

/// Nickname shown for authors that no longer exist.
pub const UNKNOWN_NICKNAME: &str = "알 수 없음";

/// Tier shown for authors that no longer exist.
pub const UNKNOWN_TIER: &str = "루키";

/// Use case for mission comments and replies.
pub struct CommentsUseCase {
    comments: Arc<dyn CommentRepository>,
    missions: Arc<dyn MissionRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentsUseCase {
    /// Create a new `CommentsUseCase`.
    pub const fn new(
        comments: Arc<dyn CommentRepository>,
        missions: Arc<dyn MissionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            missions,
            users,
        }
    }

    /// Comments on a mission with their replies, oldest first.
    ///
    /// `viewer` decides the `is_liked` flags.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn list(
        &self,
        mission_id: &MissionId,
        viewer: Option<&UserId>,
    ) -> Result<Vec<CommentDto>, ServiceError> {
        // 1. Load comments and replies
        let comments = self.comments.list_comments(mission_id).await?;
        let comment_ids: Vec<CommentId> = comments.iter().map(|c| c.id.clone()).collect();
        let replies = self.comments.list_replies(&comment_ids).await?;

        // 2. Resolve authors
        let mut author_ids: Vec<UserId> = comments
            .iter()
            .map(|c| c.user_id.clone())
            .chain(replies.iter().map(|r| r.user_id.clone()))
            .collect();
        author_ids.sort();
        author_ids.dedup();
        let authors: HashMap<UserId, User> = self
            .users
            .find_many(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id().clone(), u))
            .collect();

        // 3. Resolve likes
        let liked = match viewer {
            Some(viewer) => {
                let targets: Vec<String> = comment_ids
                    .iter()
                    .map(ToString::to_string)
                    .chain(replies.iter().map(|r| r.id.to_string()))
                    .collect();
                self.comments.liked_by(viewer, &targets).await?
            }
            None => Default::default(),
        };

        // 4. Assemble
        let mut by_parent: HashMap<CommentId, Vec<ReplyDto>> = HashMap::new();
        for reply in &replies {
            let dto = reply_dto(reply, authors.get(&reply.user_id), liked.contains(reply.id.as_str()));
            by_parent.entry(reply.comment_id.clone()).or_default().push(dto);
        }

        Ok(comments
            .iter()
            .map(|comment| {
                let (nickname, tier) = author_label(authors.get(&comment.user_id));
                CommentDto {
                    id: comment.id.to_string(),
                    mission_id: comment.mission_id.to_string(),
                    user_id: comment.user_id.to_string(),
                    nickname,
                    tier,
                    content: comment.visible_content().to_string(),
                    likes_count: comment.likes_count,
                    replies_count: comment.replies_count,
                    is_liked: liked.contains(comment.id.as_str()),
                    is_deleted: comment.is_deleted,
                    created_at: comment.created_at,
                    replies: by_parent.remove(&comment.id).unwrap_or_default(),
                }
            })
            .collect())
    }

    /// Post a comment on a mission.
    ///
    /// # Errors
    ///
    /// Returns error if the mission is unknown or the content is invalid.
    pub async fn create_comment(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
        content: &str,
    ) -> Result<CommentDto, ServiceError> {
        let mission = self
            .missions
            .find_by_id(mission_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mission", mission_id))?;
        let author = self.users.find_by_id(user_id).await?;

        let comment = Comment::new(
            mission_id.clone(),
            MissionType::for_form(mission.form()),
            user_id.clone(),
            content,
        )?;
        self.comments.save_comment(&comment).await?;

        let (nickname, tier) = author_label(author.as_ref());
        Ok(CommentDto {
            id: comment.id.to_string(),
            mission_id: comment.mission_id.to_string(),
            user_id: comment.user_id.to_string(),
            nickname,
            tier,
            content: comment.content.clone(),
            likes_count: 0,
            replies_count: 0,
            is_liked: false,
            is_deleted: false,
            created_at: comment.created_at,
            replies: Vec::new(),
        })
    }

    /// Reply to a comment.
    ///
    /// # Errors
    ///
    /// Returns error if the parent is unknown or deleted, or the content is invalid.
    pub async fn create_reply(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
        content: &str,
    ) -> Result<ReplyDto, ServiceError> {
        let parent = self
            .comments
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id))?;
        let reply = Reply::new(&parent, user_id.clone(), content)?;
        self.comments.add_reply(&reply).await?;

        let author = self.users.find_by_id(user_id).await?;
        Ok(reply_dto(&reply, author.as_ref(), false))
    }

    /// Soft-delete a comment. Only its author may.
    ///
    /// # Errors
    ///
    /// Returns `FORBIDDEN` for other users and `NOT_FOUND` for unknown comments.
    pub async fn delete_comment(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), ServiceError> {
        let mut comment = self
            .comments
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id))?;
        comment.delete(user_id)?;
        self.comments.save_comment(&comment).await?;
        Ok(())
    }

    /// Soft-delete a reply. Only its author may.
    ///
    /// # Errors
    ///
    /// Returns `FORBIDDEN` for other users and `NOT_FOUND` for unknown replies.
    pub async fn delete_reply(&self, reply_id: &ReplyId, user_id: &UserId) -> Result<(), ServiceError> {
        let mut reply = self
            .comments
            .find_reply(reply_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reply", reply_id))?;
        reply.delete(user_id)?;
        self.comments.save_reply(&reply).await?;
        Ok(())
    }

    /// Like or unlike a comment.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for unknown comments.
    pub async fn toggle_comment_like(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<LikeToggle, ServiceError> {
        Ok(self.comments.toggle_comment_like(comment_id, user_id).await?)
    }

    /// Like or unlike a reply.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for unknown replies.
    pub async fn toggle_reply_like(
        &self,
        reply_id: &ReplyId,
        user_id: &UserId,
    ) -> Result<LikeToggle, ServiceError> {
        Ok(self.comments.toggle_reply_like(reply_id, user_id).await?)
    }
}

fn author_label(author: Option<&User>) -> (String, String) {
    author.map_or_else(
        || (UNKNOWN_NICKNAME.to_string(), UNKNOWN_TIER.to_string()),
        |u| (u.nickname().to_string(), u.tier().to_string()),
    )
}

fn reply_dto(reply: &Reply, author: Option<&User>, is_liked: bool) -> ReplyDto {
    let (nickname, tier) = author_label(author);
    ReplyDto {
        id: reply.id.to_string(),
        comment_id: reply.comment_id.to_string(),
        user_id: reply.user_id.to_string(),
        nickname,
        tier,
        content: reply.visible_content().to_string(),
        likes_count: reply.likes_count,
        is_liked,
        is_deleted: reply.is_deleted,
        created_at: reply.created_at,
    }
}
