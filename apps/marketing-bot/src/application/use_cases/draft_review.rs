//! Draft Review Use Case
//!
//! Admin listing and approval of AI drafts, plus the bulk show-id repair.

use std::sync::Arc;

use crate::application::dto::{FixShowIdsReport, MAX_FIX_DETAILS, ShowIdChange};
use crate::domain::draft::{
    DraftRepository, DraftStatus, MissionDraft, extract_show_keyword, resolve_show,
};
use crate::domain::shared::{DomainError, DraftId, Timestamp};
use crate::error::ServiceError;

/// Use case for reviewing drafts.
pub struct DraftReviewUseCase {
    drafts: Arc<dyn DraftRepository>,
}

impl DraftReviewUseCase {
    /// Create a new `DraftReviewUseCase`.
    pub const fn new(drafts: Arc<dyn DraftRepository>) -> Self {
        Self { drafts }
    }

    /// Drafts with `status`, newest first.
    pub async fn list(&self, status: Option<DraftStatus>) -> Result<Vec<MissionDraft>, ServiceError> {
        Ok(self.drafts.list(status).await?)
    }

    /// Approve a pending draft.
    pub async fn approve(&self, id: &DraftId) -> Result<MissionDraft, ServiceError> {
        let mut draft = self.load(id).await?;
        draft.approve(Timestamp::now())?;
        self.drafts.save(&draft).await?;
        tracing::info!(draft_id = %id, "Draft approved");
        Ok(draft)
    }

    /// Reject a pending draft.
    pub async fn reject(&self, id: &DraftId) -> Result<MissionDraft, ServiceError> {
        let mut draft = self.load(id).await?;
        draft.reject(Timestamp::now())?;
        self.drafts.save(&draft).await?;
        tracing::info!(draft_id = %id, "Draft rejected");
        Ok(draft)
    }

    async fn load(&self, id: &DraftId) -> Result<MissionDraft, ServiceError> {
        self.drafts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("MissionDraft", id).into())
    }

    /// Re-detect the show of every pending draft from its source video.
    ///
    /// Drafts whose video names no known show, or whose show already
    /// matches, are skipped.
    pub async fn fix_show_ids(&self) -> Result<FixShowIdsReport, ServiceError> {
        let pending = self.drafts.list(Some(DraftStatus::Pending)).await?;
        let now = Timestamp::now();
        let mut updated = 0;
        let mut skipped = 0;
        let mut details = Vec::new();

        for mut draft in pending {
            let source = draft.source_video();
            let Some(show) =
                extract_show_keyword(&source.title, &source.channel_name, &source.description)
                    .and_then(resolve_show)
            else {
                skipped += 1;
                continue;
            };

            let old_show_id = draft.show_id().to_string();
            let old_category = draft.category();
            if !draft.reassign_show(show.show_id, show.category, now) {
                skipped += 1;
                continue;
            }
            self.drafts.save(&draft).await?;
            updated += 1;
            tracing::debug!(
                draft_id = %draft.id(),
                old_show_id = %old_show_id,
                new_show_id = show.show_id,
                "Draft show repaired"
            );

            if details.len() < MAX_FIX_DETAILS {
                details.push(ShowIdChange {
                    id: draft.id().to_string(),
                    old_show_id,
                    new_show_id: show.show_id.to_string(),
                    old_category,
                    new_category: show.category,
                    title: draft.title().to_string(),
                });
            }
        }

        tracing::info!(updated, skipped, "Show-id repair finished");
        Ok(FixShowIdsReport {
            success: true,
            message: format!("총 {updated}개의 미션 정보를 수정했습니다. (건너뜀: {skipped})"),
            updated,
            skipped,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::pending_draft;
    use crate::error::ErrorCode;
    use crate::infrastructure::persistence::InMemoryDraftRepository;
    use pick_server::domain::catalog::ShowCategory;

    async fn seeded(drafts: &[MissionDraft]) -> (DraftReviewUseCase, Arc<InMemoryDraftRepository>) {
        let repo = Arc::new(InMemoryDraftRepository::new());
        for d in drafts {
            repo.save(d).await.unwrap();
        }
        (DraftReviewUseCase::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn approve_then_reject_conflicts() {
        let draft = pending_draft("나는솔로 24기", "nasolo", ShowCategory::Love);
        let (uc, _) = seeded(&[draft.clone()]).await;

        let approved = uc.approve(draft.id()).await.unwrap();
        assert_eq!(approved.status(), DraftStatus::Approved);

        let err = uc.reject(draft.id()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn unknown_draft_is_not_found() {
        let (uc, _) = seeded(&[]).await;
        let err = uc.approve(&DraftId::new("missing")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let a = pending_draft("a", "nasolo", ShowCategory::Love);
        let b = pending_draft("b", "nasolo", ShowCategory::Love);
        let (uc, _) = seeded(&[a.clone(), b]).await;
        uc.reject(a.id()).await.unwrap();

        assert_eq!(uc.list(Some(DraftStatus::Pending)).await.unwrap().len(), 1);
        assert_eq!(uc.list(Some(DraftStatus::Rejected)).await.unwrap().len(), 1);
        assert_eq!(uc.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fix_show_ids_updates_mislabeled_drafts() {
        let wrong = pending_draft("최강야구 몬스터즈 직관", "nasolo", ShowCategory::Love);
        let right = pending_draft("나는 솔로 24기", "nasolo", ShowCategory::Love);
        let unknown = pending_draft("일상 브이로그", "nasolo", ShowCategory::Love);
        let (uc, repo) = seeded(&[wrong.clone(), right, unknown]).await;

        let report = uc.fix_show_ids().await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.message, "총 1개의 미션 정보를 수정했습니다. (건너뜀: 2)");
        assert_eq!(report.details[0].new_show_id, "choegang-yagu-2025");
        assert_eq!(report.details[0].new_category, ShowCategory::Victory);

        let stored = repo.find_by_id(wrong.id()).await.unwrap().unwrap();
        assert_eq!(stored.show_id(), "choegang-yagu-2025");

        let again = uc.fix_show_ids().await.unwrap();
        assert_eq!(again.updated, 0);
    }

    #[tokio::test]
    async fn reviewed_drafts_are_left_alone() {
        let draft = pending_draft("환승연애4 X", "nasolo", ShowCategory::Love);
        let (uc, _) = seeded(&[draft.clone()]).await;
        uc.approve(draft.id()).await.unwrap();

        let report = uc.fix_show_ids().await.unwrap();
        assert_eq!(report.updated + report.skipped, 0);
    }
}
