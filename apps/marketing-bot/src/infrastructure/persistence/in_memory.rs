//! In-memory repositories.
//!
//! Maps are guarded by `parking_lot::RwLock`.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::cafe::{CafePost, CafePostRepository, CrawlProgress, ProgressRepository};
use crate::domain::draft::{DraftRepository, DraftStatus, MissionDraft};
use crate::domain::shared::{
    CafePostId, ChannelId, DomainError, DraftId, ProgressId, Timestamp, VideoId,
};
use crate::domain::video::{Channel, ChannelRepository, Video, VideoRepository};

// ============================================================================
// Videos
// ============================================================================

/// In-memory implementation of `VideoRepository`.
#[derive(Debug, Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<VideoId, Video>>,
}

impl InMemoryVideoRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored videos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.videos.read().len()
    }

    /// Whether no video is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.videos.read().is_empty()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn delete_expired(&self, now: Timestamp) -> Result<usize, DomainError> {
        let mut videos = self.videos.write();
        let before = videos.len();
        videos.retain(|_, v| !v.is_expired(now));
        Ok(before - videos.len())
    }

    async fn existing_ids(&self, ids: &[VideoId]) -> Result<HashSet<VideoId>, DomainError> {
        let videos = self.videos.read();
        Ok(ids
            .iter()
            .filter(|id| videos.contains_key(*id))
            .cloned()
            .collect())
    }

    async fn save_all(&self, batch: &[Video]) -> Result<(), DomainError> {
        let mut videos = self.videos.write();
        for video in batch {
            videos.insert(video.id().clone(), video.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, DomainError> {
        Ok(self.videos.read().get(id).cloned())
    }
}

// ============================================================================
// Channels
// ============================================================================

/// In-memory implementation of `ChannelRepository`.
#[derive(Debug, Default)]
pub struct InMemoryChannelRepository {
    channels: RwLock<HashMap<ChannelId, Channel>>,
}

impl InMemoryChannelRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn find_by_id(&self, id: &ChannelId) -> Result<Option<Channel>, DomainError> {
        Ok(self.channels.read().get(id).cloned())
    }

    async fn save(&self, channel: &Channel) -> Result<(), DomainError> {
        self.channels
            .write()
            .insert(channel.channel_id.clone(), channel.clone());
        Ok(())
    }
}

// ============================================================================
// Drafts
// ============================================================================

/// In-memory implementation of `DraftRepository`.
#[derive(Debug, Default)]
pub struct InMemoryDraftRepository {
    drafts: RwLock<HashMap<DraftId, MissionDraft>>,
}

impl InMemoryDraftRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn save(&self, draft: &MissionDraft) -> Result<(), DomainError> {
        self.drafts.write().insert(draft.id().clone(), draft.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DraftId) -> Result<Option<MissionDraft>, DomainError> {
        Ok(self.drafts.read().get(id).cloned())
    }

    async fn list(&self, status: Option<DraftStatus>) -> Result<Vec<MissionDraft>, DomainError> {
        let mut drafts: Vec<MissionDraft> = self
            .drafts
            .read()
            .values()
            .filter(|d| status.is_none_or(|s| d.status() == s))
            .cloned()
            .collect();
        drafts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(drafts)
    }
}

// ============================================================================
// Cafe posts
// ============================================================================

/// In-memory implementation of `CafePostRepository`.
#[derive(Debug, Default)]
pub struct InMemoryCafePostRepository {
    posts: RwLock<HashMap<CafePostId, CafePost>>,
}

impl InMemoryCafePostRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CafePostRepository for InMemoryCafePostRepository {
    async fn exists(&self, id: &CafePostId) -> Result<bool, DomainError> {
        Ok(self.posts.read().contains_key(id))
    }

    async fn save(&self, post: &CafePost) -> Result<(), DomainError> {
        self.posts.write().insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<CafePost>, DomainError> {
        let mut posts: Vec<CafePost> = self.posts.read().values().cloned().collect();
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        posts.truncate(limit);
        Ok(posts)
    }

    async fn delete(&self, id: &CafePostId) -> Result<bool, DomainError> {
        Ok(self.posts.write().remove(id).is_some())
    }
}

// ============================================================================
// Crawl progress
// ============================================================================

/// In-memory implementation of `ProgressRepository`.
#[derive(Debug, Default)]
pub struct InMemoryProgressRepository {
    records: RwLock<HashMap<ProgressId, CrawlProgress>>,
}

impl InMemoryProgressRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<CrawlProgress> {
        let mut records: Vec<CrawlProgress> = self.records.read().values().cloned().collect();
        records.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        records
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn save(&self, progress: &CrawlProgress) -> Result<(), DomainError> {
        self.records
            .write()
            .insert(progress.id.clone(), progress.clone());
        Ok(())
    }

    async fn find(&self, id: &ProgressId) -> Result<Option<CrawlProgress>, DomainError> {
        Ok(self.records.read().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{cafe_article, pending_draft, snapshot};
    use pick_server::domain::catalog::ShowCategory;

    #[tokio::test]
    async fn expired_videos_are_purged() {
        let repo = InMemoryVideoRepository::new();
        let now = Timestamp::now();
        let old = Video::collect(snapshot("old", "t", "c", 1), "k", now.plus(chrono::Duration::days(-40)));
        let fresh = Video::collect(snapshot("new", "t", "c", 1), "k", now);
        repo.save_all(&[old, fresh]).await.unwrap();

        assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
        let existing = repo
            .existing_ids(&[VideoId::new("old"), VideoId::new("new")])
            .await
            .unwrap();
        assert_eq!(existing, HashSet::from([VideoId::new("new")]));
    }

    #[tokio::test]
    async fn drafts_filter_by_status() {
        let repo = InMemoryDraftRepository::new();
        let mut approved = pending_draft("a", "nasolo", ShowCategory::Love);
        approved.approve(Timestamp::now()).unwrap();
        repo.save(&approved).await.unwrap();
        repo.save(&pending_draft("b", "nasolo", ShowCategory::Love))
            .await
            .unwrap();

        assert_eq!(repo.list(Some(DraftStatus::Approved)).await.unwrap().len(), 1);
        assert_eq!(repo.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn recent_posts_are_newest_first_and_deletable() {
        let repo = InMemoryCafePostRepository::new();
        let base = Timestamp::now();
        for (i, id) in ["1", "2", "3"].into_iter().enumerate() {
            let mut article = cafe_article(id, "제목", "본문");
            article.published_at = Some(base.plus(chrono::Duration::minutes(i as i64)));
            let post = CafePost::from_article(&article, id, None, String::new(), base);
            repo.save(&post).await.unwrap();
        }

        let recent = repo.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].post_id, "3");

        assert!(repo.delete(&recent[0].id).await.unwrap());
        assert!(!repo.delete(&recent[0].id).await.unwrap());
        assert!(!repo.exists(&recent[0].id).await.unwrap());
    }
}
