//! In-memory repositories.
//!
//! Maps are guarded by `parking_lot::RwLock`. Operations that must be
//! atomic (pick upserts, ledger application, reply counts, like toggles)
//! run under a single write lock. Mission saves compare versions under
//! that lock.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::comment::{Comment, CommentRepository, LikeToggle, Reply};
use crate::domain::mission::{Mission, MissionFilter, MissionRepository};
use crate::domain::notification::{Notification, NotificationPreferences, NotificationRepository};
use crate::domain::pick::{MatchPick, Pick, PickRepository};
use crate::domain::scoring::PointLog;
use crate::domain::shared::{
    CommentId, DomainError, MissionId, NotificationId, ReplyId, Timestamp, UserId,
};
use crate::domain::user::{User, UserRepository};

// ============================================================================
// Missions
// ============================================================================

/// In-memory implementation of `MissionRepository`.
#[derive(Debug, Default)]
pub struct InMemoryMissionRepository {
    missions: RwLock<HashMap<String, Mission>>,
}

impl InMemoryMissionRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored missions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.missions.read().len()
    }

    /// Whether no mission is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missions.read().is_empty()
    }
}

#[async_trait]
impl MissionRepository for InMemoryMissionRepository {
    async fn save(&self, mission: &mut Mission) -> Result<(), DomainError> {
        let mut missions = self.missions.write();
        if let Some(stored) = missions.get(mission.id().as_str())
            && stored.version() != mission.version()
        {
            return Err(DomainError::Conflict {
                entity_type: "Mission".to_string(),
                message: format!(
                    "{} was saved at version {}, this copy is at {}",
                    mission.id(),
                    stored.version(),
                    mission.version()
                ),
            });
        }
        mission.mark_saved();
        let mut stored = mission.clone();
        stored.drain_events();
        missions.insert(mission.id().to_string(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &MissionId) -> Result<Option<Mission>, DomainError> {
        Ok(self.missions.read().get(id.as_str()).cloned())
    }

    async fn list(&self, filter: &MissionFilter) -> Result<Vec<Mission>, DomainError> {
        let mut missions: Vec<Mission> = self
            .missions
            .read()
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        missions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(missions)
    }
}

// ============================================================================
// Picks
// ============================================================================

#[derive(Debug, Default)]
struct PickTables {
    picks: Vec<Pick>,
    match_picks: Vec<MatchPick>,
}

/// In-memory implementation of `PickRepository`.
///
/// Picks keep insertion order so participants come out first-seen first.
#[derive(Debug, Default)]
pub struct InMemoryPickRepository {
    tables: RwLock<PickTables>,
}

impl InMemoryPickRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PickRepository for InMemoryPickRepository {
    async fn upsert_pick(&self, pick: Pick) -> Result<bool, DomainError> {
        let mut tables = self.tables.write();
        let existing = tables
            .picks
            .iter_mut()
            .find(|p| p.mission_id() == pick.mission_id() && p.user_id() == pick.user_id());
        match existing {
            Some(slot) => {
                *slot = slot.replaced_by(pick);
                Ok(false)
            }
            None => {
                tables.picks.push(pick);
                Ok(true)
            }
        }
    }

    async fn find_pick(
        &self,
        mission_id: &MissionId,
        user_id: &UserId,
    ) -> Result<Option<Pick>, DomainError> {
        Ok(self
            .tables
            .read()
            .picks
            .iter()
            .find(|p| p.mission_id() == mission_id && p.user_id() == user_id)
            .cloned())
    }

    async fn list_picks(&self, mission_id: &MissionId) -> Result<Vec<Pick>, DomainError> {
        Ok(self
            .tables
            .read()
            .picks
            .iter()
            .filter(|p| p.mission_id() == mission_id)
            .cloned()
            .collect())
    }

    async fn upsert_match_pick(&self, pick: MatchPick) -> Result<bool, DomainError> {
        let mut tables = self.tables.write();
        let existing = tables.match_picks.iter_mut().find(|p| {
            p.mission_id() == pick.mission_id()
                && p.user_id() == pick.user_id()
                && p.episode_no() == pick.episode_no()
        });
        match existing {
            Some(slot) => {
                *slot = slot.replaced_by(pick);
                Ok(false)
            }
            None => {
                tables.match_picks.push(pick);
                Ok(true)
            }
        }
    }

    async fn list_match_picks(
        &self,
        mission_id: &MissionId,
    ) -> Result<Vec<MatchPick>, DomainError> {
        Ok(self
            .tables
            .read()
            .match_picks
            .iter()
            .filter(|p| p.mission_id() == mission_id)
            .cloned()
            .collect())
    }

    async fn participants(&self, mission_id: &MissionId) -> Result<Vec<UserId>, DomainError> {
        let tables = self.tables.read();
        let mut seen = HashSet::new();
        let users = tables
            .picks
            .iter()
            .filter(|p| p.mission_id() == mission_id)
            .map(Pick::user_id)
            .chain(
                tables
                    .match_picks
                    .iter()
                    .filter(|p| p.mission_id() == mission_id)
                    .map(MatchPick::user_id),
            )
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();
        Ok(users)
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Default)]
struct UserTables {
    users: HashMap<String, User>,
    point_logs: Vec<PointLog>,
}

/// In-memory implementation of `UserRepository`.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<UserTables>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        self.tables
            .write()
            .users
            .insert(user.id().to_string(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().users.get(id.as_str()).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id.as_str()).cloned())
            .collect())
    }

    async fn list_with_email(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self
            .tables
            .read()
            .users
            .values()
            .filter(|u| u.email().is_some())
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(users)
    }

    async fn ranking(&self, limit: usize) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.tables.read().users.values().cloned().collect();
        users.sort_by(|a, b| {
            b.points()
                .cmp(&a.points())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        users.truncate(limit);
        Ok(users)
    }

    async fn apply_point_log(&self, log: PointLog) -> Result<User, DomainError> {
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(log.user_id.as_str())
            .ok_or_else(|| DomainError::not_found("User", &log.user_id))?;
        user.apply_points(log.diff);
        let updated = user.clone();
        tables.point_logs.push(log);
        Ok(updated)
    }

    async fn point_logs(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<PointLog>, DomainError> {
        Ok(self
            .tables
            .read()
            .point_logs
            .iter()
            .rev()
            .filter(|log| &log.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Default)]
struct CommentTables {
    comments: Vec<Comment>,
    replies: Vec<Reply>,
    likes: HashSet<(String, String)>,
}

impl CommentTables {
    fn toggle_like(&mut self, target: &str, user_id: &UserId) -> bool {
        let key = (target.to_string(), user_id.to_string());
        if self.likes.remove(&key) {
            false
        } else {
            self.likes.insert(key);
            true
        }
    }
}

/// In-memory implementation of `CommentRepository`.
#[derive(Debug, Default)]
pub struct InMemoryCommentRepository {
    tables: RwLock<CommentTables>,
}

impl InMemoryCommentRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn save_comment(&self, comment: &Comment) -> Result<(), DomainError> {
        let mut tables = self.tables.write();
        match tables.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(slot) => *slot = comment.clone(),
            None => tables.comments.push(comment.clone()),
        }
        Ok(())
    }

    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .tables
            .read()
            .comments
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }

    async fn list_comments(&self, mission_id: &MissionId) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .tables
            .read()
            .comments
            .iter()
            .filter(|c| &c.mission_id == mission_id)
            .cloned()
            .collect())
    }

    async fn add_reply(&self, reply: &Reply) -> Result<(), DomainError> {
        let mut tables = self.tables.write();
        let parent = tables
            .comments
            .iter_mut()
            .find(|c| c.id == reply.comment_id)
            .ok_or_else(|| DomainError::not_found("Comment", &reply.comment_id))?;
        parent.replies_count += 1;
        tables.replies.push(reply.clone());
        Ok(())
    }

    async fn save_reply(&self, reply: &Reply) -> Result<(), DomainError> {
        let mut tables = self.tables.write();
        let slot = tables
            .replies
            .iter_mut()
            .find(|r| r.id == reply.id)
            .ok_or_else(|| DomainError::not_found("Reply", &reply.id))?;
        *slot = reply.clone();
        Ok(())
    }

    async fn find_reply(&self, id: &ReplyId) -> Result<Option<Reply>, DomainError> {
        Ok(self
            .tables
            .read()
            .replies
            .iter()
            .find(|r| &r.id == id)
            .cloned())
    }

    async fn list_replies(&self, comment_ids: &[CommentId]) -> Result<Vec<Reply>, DomainError> {
        Ok(self
            .tables
            .read()
            .replies
            .iter()
            .filter(|r| comment_ids.contains(&r.comment_id))
            .cloned()
            .collect())
    }

    async fn toggle_comment_like(
        &self,
        id: &CommentId,
        user_id: &UserId,
    ) -> Result<LikeToggle, DomainError> {
        let mut tables = self.tables.write();
        if !tables.comments.iter().any(|c| &c.id == id) {
            return Err(DomainError::not_found("Comment", id));
        }
        let is_liked = tables.toggle_like(id.as_str(), user_id);
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| DomainError::not_found("Comment", id))?;
        comment.likes_count = if is_liked {
            comment.likes_count + 1
        } else {
            comment.likes_count.saturating_sub(1)
        };
        Ok(LikeToggle {
            is_liked,
            likes_count: comment.likes_count,
        })
    }

    async fn toggle_reply_like(
        &self,
        id: &ReplyId,
        user_id: &UserId,
    ) -> Result<LikeToggle, DomainError> {
        let mut tables = self.tables.write();
        if !tables.replies.iter().any(|r| &r.id == id) {
            return Err(DomainError::not_found("Reply", id));
        }
        let is_liked = tables.toggle_like(id.as_str(), user_id);
        let reply = tables
            .replies
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| DomainError::not_found("Reply", id))?;
        reply.likes_count = if is_liked {
            reply.likes_count + 1
        } else {
            reply.likes_count.saturating_sub(1)
        };
        Ok(LikeToggle {
            is_liked,
            likes_count: reply.likes_count,
        })
    }

    async fn liked_by(
        &self,
        user_id: &UserId,
        target_ids: &[String],
    ) -> Result<HashSet<String>, DomainError> {
        let tables = self.tables.read();
        Ok(target_ids
            .iter()
            .filter(|id| {
                tables
                    .likes
                    .contains(&((*id).clone(), user_id.to_string()))
            })
            .cloned()
            .collect())
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Default)]
struct NotificationTables {
    notifications: Vec<Notification>,
    preferences: HashMap<String, NotificationPreferences>,
}

/// In-memory implementation of `NotificationRepository`.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    tables: RwLock<NotificationTables>,
}

impl InMemoryNotificationRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().notifications.len()
    }

    /// Whether no notification is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.read().notifications.is_empty()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save_all(&self, notifications: &[Notification]) -> Result<(), DomainError> {
        self.tables
            .write()
            .notifications
            .extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, DomainError> {
        Ok(self
            .tables
            .read()
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), DomainError> {
        let mut tables = self.tables.write();
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Notification", id))?;
        notification.is_read = true;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let mut tables = self.tables.write();
        let mut changed = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| &n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_read_before(&self, cutoff: Timestamp) -> Result<usize, DomainError> {
        let mut tables = self.tables.write();
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|n| !(n.is_read && n.created_at < cutoff));
        Ok(before - tables.notifications.len())
    }

    async fn preferences(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreferences>, DomainError> {
        Ok(self.tables.read().preferences.get(user_id.as_str()).cloned())
    }

    async fn all_preferences(&self) -> Result<Vec<NotificationPreferences>, DomainError> {
        Ok(self.tables.read().preferences.values().cloned().collect())
    }

    async fn save_preferences(&self, prefs: &NotificationPreferences) -> Result<(), DomainError> {
        self.tables
            .write()
            .preferences
            .insert(prefs.user_id.to_string(), prefs.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ShowCategory;
    use crate::domain::mission::MatchPair;
    use crate::domain::notification::NotificationType;
    use crate::domain::scoring::{MissionType, PointLogMetadata};
    use crate::domain::user::CreateUserCommand;

    fn user(id: &str) -> User {
        User::new(CreateUserCommand {
            id: Some(UserId::new(id)),
            email: Some(format!("{id}@example.com")),
            nickname: id.to_string(),
            avatar_url: None,
        })
        .unwrap()
    }

    fn pick(mission: &str, user: &str, option: &str) -> Pick {
        Pick::new(
            MissionId::new(mission),
            UserId::new(user),
            option,
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn pick_upsert_replaces_existing() {
        let repo = InMemoryPickRepository::new();

        assert!(repo.upsert_pick(pick("m1", "u1", "A")).await.unwrap());
        assert!(!repo.upsert_pick(pick("m1", "u1", "B")).await.unwrap());

        let picks = repo.list_picks(&MissionId::new("m1")).await.unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].selected_option(), "B");
    }

    #[tokio::test]
    async fn match_picks_are_keyed_by_episode() {
        let repo = InMemoryPickRepository::new();
        let mp = |ep| {
            MatchPick::new(
                MissionId::new("m1"),
                UserId::new("u1"),
                ep,
                vec![MatchPair::new("영수", "옥순")],
                Timestamp::now(),
            )
            .unwrap()
        };

        assert!(repo.upsert_match_pick(mp(1)).await.unwrap());
        assert!(repo.upsert_match_pick(mp(2)).await.unwrap());
        assert!(!repo.upsert_match_pick(mp(2)).await.unwrap());
        assert_eq!(
            repo.list_match_picks(&MissionId::new("m1"))
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn participants_are_unique_in_first_seen_order() {
        let repo = InMemoryPickRepository::new();
        repo.upsert_pick(pick("m1", "u2", "A")).await.unwrap();
        repo.upsert_pick(pick("m1", "u1", "A")).await.unwrap();
        repo.upsert_pick(pick("m2", "u3", "A")).await.unwrap();
        repo.upsert_match_pick(
            MatchPick::new(
                MissionId::new("m1"),
                UserId::new("u2"),
                1,
                vec![MatchPair::new("a", "b")],
                Timestamp::now(),
            )
            .unwrap(),
        )
        .await
        .unwrap();

        let ids = repo.participants(&MissionId::new("m1")).await.unwrap();
        assert_eq!(ids, vec![UserId::new("u2"), UserId::new("u1")]);
    }

    #[tokio::test]
    async fn point_log_clamps_and_records() {
        let repo = InMemoryUserRepository::new();
        repo.save(&user("u1")).await.unwrap();

        let log = |diff| {
            PointLog::new(
                UserId::new("u1"),
                MissionId::new("m1"),
                MissionType::Mission2,
                diff,
                "test",
                PointLogMetadata::default(),
            )
        };
        let updated = repo.apply_point_log(log(100)).await.unwrap();
        assert_eq!(updated.points(), 100);
        let updated = repo.apply_point_log(log(-300)).await.unwrap();
        assert_eq!(updated.points(), 0);

        let logs = repo.point_logs(&UserId::new("u1"), 10).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].diff, -300);
    }

    #[tokio::test]
    async fn point_log_for_unknown_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .apply_point_log(PointLog::new(
                UserId::new("ghost"),
                MissionId::new("m1"),
                MissionType::Mission1,
                10,
                "test",
                PointLogMetadata::default(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn ranking_orders_by_points() {
        let repo = InMemoryUserRepository::new();
        let mut rich = user("rich");
        rich.apply_points(500);
        repo.save(&user("poor")).await.unwrap();
        repo.save(&rich).await.unwrap();

        let ranking = repo.ranking(1).await.unwrap();
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].id().as_str(), "rich");
    }

    #[tokio::test]
    async fn reply_bumps_parent_count_and_likes_toggle() {
        let repo = InMemoryCommentRepository::new();
        let comment = Comment::new(
            MissionId::new("m1"),
            MissionType::Mission1,
            UserId::new("u1"),
            "첫 댓글",
        )
        .unwrap();
        repo.save_comment(&comment).await.unwrap();
        let reply = Reply::new(&comment, UserId::new("u2"), "답글").unwrap();
        repo.add_reply(&reply).await.unwrap();

        let stored = repo.find_comment(&comment.id).await.unwrap().unwrap();
        assert_eq!(stored.replies_count, 1);

        let liked = repo
            .toggle_comment_like(&comment.id, &UserId::new("u2"))
            .await
            .unwrap();
        assert_eq!(
            liked,
            LikeToggle {
                is_liked: true,
                likes_count: 1
            }
        );
        let unliked = repo
            .toggle_comment_like(&comment.id, &UserId::new("u2"))
            .await
            .unwrap();
        assert_eq!(unliked.likes_count, 0);
        assert!(!unliked.is_liked);
    }

    #[tokio::test]
    async fn notifications_prune_only_old_read_entries() {
        let repo = InMemoryNotificationRepository::new();
        let n = |user: &str| {
            Notification::new(
                UserId::new(user),
                NotificationType::System,
                "t",
                "c",
                None,
                None,
            )
        };
        repo.save_all(&[n("u1"), n("u1"), n("u2")]).await.unwrap();
        assert_eq!(repo.mark_all_read(&UserId::new("u1")).await.unwrap(), 2);

        let future = Timestamp::now().plus(chrono::Duration::days(1));
        assert_eq!(repo.delete_read_before(future).await.unwrap(), 2);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn subscribers_follow_category() {
        let repo = InMemoryNotificationRepository::new();
        let mut prefs = NotificationPreferences::defaults_for(UserId::new("u1"));
        prefs.categories = vec![ShowCategory::Love];
        repo.save_preferences(&prefs).await.unwrap();
        repo.save_preferences(&NotificationPreferences::defaults_for(UserId::new("u2")))
            .await
            .unwrap();

        let subs = repo.subscribers(ShowCategory::Love).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].user_id.as_str(), "u1");
    }
}
