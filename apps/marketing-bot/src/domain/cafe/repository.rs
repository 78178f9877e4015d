//! Cafe repository traits.

use async_trait::async_trait;

use super::{CafePost, CrawlProgress};
use crate::domain::shared::{CafePostId, DomainError, ProgressId};

/// Storage of cafe posts.
#[async_trait]
pub trait CafePostRepository: Send + Sync {
    /// Whether a post is already stored.
    async fn exists(&self, id: &CafePostId) -> Result<bool, DomainError>;

    /// Insert or replace a post.
    async fn save(&self, post: &CafePost) -> Result<(), DomainError>;

    /// Newest posts by publish time.
    async fn list_recent(&self, limit: usize) -> Result<Vec<CafePost>, DomainError>;

    /// Remove a post. Returns whether it existed.
    async fn delete(&self, id: &CafePostId) -> Result<bool, DomainError>;
}

/// Storage of crawl progress records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Insert or replace a record.
    async fn save(&self, progress: &CrawlProgress) -> Result<(), DomainError>;

    /// Find a record.
    async fn find(&self, id: &ProgressId) -> Result<Option<CrawlProgress>, DomainError>;
}
