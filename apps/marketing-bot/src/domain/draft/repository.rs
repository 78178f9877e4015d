//! Draft repository trait.

use async_trait::async_trait;

use super::{DraftStatus, MissionDraft};
use crate::domain::shared::{DomainError, DraftId};

/// Storage of mission drafts.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Insert or replace a draft.
    async fn save(&self, draft: &MissionDraft) -> Result<(), DomainError>;

    /// Find a draft.
    async fn find_by_id(&self, id: &DraftId) -> Result<Option<MissionDraft>, DomainError>;

    /// Drafts with `status` (all when `None`), newest first.
    async fn list(&self, status: Option<DraftStatus>) -> Result<Vec<MissionDraft>, DomainError>;
}
