//! Naver Cafe Sync Use Case
//!
//! Searches cafe articles about the shows, stores the new ones with a
//! suggested comment and keeps a progress record the dashboard can poll.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;

use crate::application::dto::{
    CAFE_LIST_LIMIT, CafeSyncCommand, CafeSyncReport, DEFAULT_CAFE_KEYWORDS, DEFAULT_CAFE_LIMIT,
};
use crate::application::ports::{CafeSearchPort, LlmPort};
use crate::application::prompts::{FALLBACK_COMMENT, clean_comment, comment_prompt};
use crate::domain::cafe::{
    ArticleFilter, CafeArticle, CafePost, CafePostRepository, CrawlProgress, ProgressRepository,
};
use crate::domain::draft::detect_show;
use crate::domain::shared::{CafePostId, DomainError, ProgressId, Timestamp};
use crate::error::{ErrorCode, ServiceError};
use crate::infrastructure::metrics;

/// Articles requested per search call.
const SEARCH_PAGE_SIZE: u32 = 100;

/// Progress is written after this many stored posts.
const PROGRESS_EVERY: usize = 10;

/// Use case for the cafe sync.
pub struct NaverCafeSyncUseCase {
    search: Arc<dyn CafeSearchPort>,
    llm: Arc<dyn LlmPort>,
    posts: Arc<dyn CafePostRepository>,
    progress: Arc<dyn ProgressRepository>,
    excluded_boards: Vec<String>,
}

struct SyncOutcome {
    saved: Vec<CafePost>,
    skipped: usize,
}

impl NaverCafeSyncUseCase {
    /// Create a new `NaverCafeSyncUseCase`.
    pub const fn new(
        search: Arc<dyn CafeSearchPort>,
        llm: Arc<dyn LlmPort>,
        posts: Arc<dyn CafePostRepository>,
        progress: Arc<dyn ProgressRepository>,
        excluded_boards: Vec<String>,
    ) -> Self {
        Self {
            search,
            llm,
            posts,
            progress,
            excluded_boards,
        }
    }

    /// Run a sync. The progress record ends `completed` or `failed`.
    pub async fn sync(&self, command: CafeSyncCommand) -> Result<CafeSyncReport, ServiceError> {
        let now = Timestamp::now();
        let mut progress = CrawlProgress::start(now);
        self.progress.save(&progress).await?;
        tracing::info!(progress_id = %progress.id, "Naver cafe crawl started");

        match self.run(&command, now, &mut progress).await {
            Ok(outcome) => {
                progress.complete(outcome.saved.len(), outcome.skipped, Timestamp::now());
                self.progress.save(&progress).await?;
                tracing::info!(
                    progress_id = %progress.id,
                    saved = outcome.saved.len(),
                    skipped = outcome.skipped,
                    "Naver cafe crawl completed"
                );
                Ok(CafeSyncReport {
                    success: true,
                    progress_id: progress.id.to_string(),
                    saved: outcome.saved.len(),
                    skipped: outcome.skipped,
                    posts: outcome.saved,
                })
            }
            Err(e) => {
                progress.fail(e.message(), Timestamp::now());
                if let Err(save_err) = self.progress.save(&progress).await {
                    tracing::error!(error = %save_err, "Failed to record crawl failure");
                }
                tracing::error!(progress_id = %progress.id, error = %e, "Naver cafe crawl failed");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        command: &CafeSyncCommand,
        now: Timestamp,
        progress: &mut CrawlProgress,
    ) -> Result<SyncOutcome, ServiceError> {
        let limit = command.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_CAFE_LIMIT);
        let end = command.end.unwrap_or(now);
        let start = command.start.unwrap_or_else(|| end.plus(Duration::hours(-24)));
        if start > end {
            return Err(ServiceError::invalid("startDate가 endDate보다 늦습니다."));
        }
        let filter = ArticleFilter::new(self.excluded_boards.clone(), start, end);

        // 1. Collect candidates
        let candidates = self.collect(command, &filter, limit).await?;
        let total = candidates.len();
        progress.advance(0, total, format!("{total}개 게시글 수집됨, 저장 중..."));
        self.progress.save(progress).await?;

        // 2. Store new posts with a suggested comment
        let mut saved = Vec::new();
        let mut skipped = 0;
        for (post_id, article) in candidates {
            let id = CafePostId::for_post(&post_id);
            if self.posts.exists(&id).await? {
                tracing::debug!(post_id = %post_id, "Duplicate cafe post skipped");
                metrics::record_cafe_post(false);
                skipped += 1;
                continue;
            }

            let comment = self.suggest_comment(&article.description).await;
            let show = detect_show(&article.title, "", &article.description);
            let post = CafePost::from_article(
                &article,
                &post_id,
                show.map(|s| s.show_id),
                comment,
                Timestamp::now(),
            );
            self.posts.save(&post).await?;
            metrics::record_cafe_post(true);
            saved.push(post);

            if saved.len() % PROGRESS_EVERY == 0 {
                progress.advance(
                    saved.len(),
                    total,
                    format!(
                        "{}/{total}개 게시글 저장 중... ({skipped}개 중복 스킵)",
                        saved.len()
                    ),
                );
                self.progress.save(progress).await?;
            }
        }

        Ok(SyncOutcome { saved, skipped })
    }

    /// Search every keyword until `limit` distinct kept articles are found.
    async fn collect(
        &self,
        command: &CafeSyncCommand,
        filter: &ArticleFilter,
        limit: usize,
    ) -> Result<Vec<(String, CafeArticle)>, ServiceError> {
        let keywords: Vec<String> = if command.keywords.iter().any(|k| !k.trim().is_empty()) {
            command
                .keywords
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        } else {
            DEFAULT_CAFE_KEYWORDS.iter().map(ToString::to_string).collect()
        };

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for keyword in &keywords {
            if candidates.len() >= limit {
                break;
            }
            let articles = self.search.search(keyword, 1, SEARCH_PAGE_SIZE).await?;
            let found = articles.len();
            for article in articles {
                if candidates.len() >= limit {
                    break;
                }
                if !filter.accepts(&article) {
                    continue;
                }
                let Some(post_id) = article.post_id().map(ToString::to_string) else {
                    continue;
                };
                if seen.insert(post_id.clone()) {
                    candidates.push((post_id, article));
                }
            }
            tracing::debug!(keyword = %keyword, found, kept = candidates.len(), "Cafe search finished");
        }
        Ok(candidates)
    }

    async fn suggest_comment(&self, content: &str) -> String {
        if content.trim().is_empty() {
            return String::new();
        }
        match self.llm.generate(&comment_prompt(content)).await {
            Ok(reply) => {
                let comment = clean_comment(&reply);
                if comment.is_empty() {
                    FALLBACK_COMMENT.to_string()
                } else {
                    comment
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Comment generation failed, using fallback");
                FALLBACK_COMMENT.to_string()
            }
        }
    }

    /// Look up a progress record.
    pub async fn progress(&self, id: &ProgressId) -> Result<CrawlProgress, ServiceError> {
        self.progress
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::new(ErrorCode::NotFound, "진행 상황을 찾을 수 없습니다."))
    }

    /// Newest stored posts.
    pub async fn recent_posts(&self) -> Result<Vec<CafePost>, ServiceError> {
        Ok(self.posts.list_recent(CAFE_LIST_LIMIT).await?)
    }

    /// Delete a stored post.
    pub async fn delete_post(&self, id: &CafePostId) -> Result<(), ServiceError> {
        if self.posts.delete(id).await? {
            tracing::info!(post_id = %id, "Cafe post deleted");
            Ok(())
        } else {
            Err(DomainError::not_found("CafePost", id).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{GeminiError, MockCafeSearchPort, MockLlmPort, NaverError};
    use crate::application::use_cases::test_support::cafe_article;
    use crate::domain::cafe::{CrawlStatus, DEFAULT_EXCLUDED_BOARDS};
    use crate::infrastructure::persistence::{
        InMemoryCafePostRepository, InMemoryProgressRepository,
    };

    struct Harness {
        use_case: NaverCafeSyncUseCase,
        posts: Arc<InMemoryCafePostRepository>,
        progress: Arc<InMemoryProgressRepository>,
    }

    fn harness(search: MockCafeSearchPort, llm: MockLlmPort) -> Harness {
        let posts = Arc::new(InMemoryCafePostRepository::new());
        let progress = Arc::new(InMemoryProgressRepository::new());
        Harness {
            use_case: NaverCafeSyncUseCase::new(
                Arc::new(search),
                Arc::new(llm),
                posts.clone(),
                progress.clone(),
                DEFAULT_EXCLUDED_BOARDS.iter().map(ToString::to_string).collect(),
            ),
            posts,
            progress,
        }
    }

    fn echo_llm() -> MockLlmPort {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().returning(|_| Ok("  저도 궁금했어요 ㅎㅎ  ".to_string()));
        llm
    }

    #[tokio::test]
    async fn stores_new_posts_and_completes_progress() {
        let mut search = MockCafeSearchPort::new();
        search.expect_search().returning(|keyword, _, _| {
            Ok(if keyword == "나는솔로" {
                vec![
                    cafe_article("1", "나는솔로 24기 옥순 어때요", "본문"),
                    cafe_article("2", "[맛집] 나솔 촬영지 식당", "본문"),
                    cafe_article("3", "나솔 영수 근황", "본문"),
                ]
            } else {
                vec![cafe_article("3", "나솔 영수 근황", "본문")]
            })
        });
        let h = harness(search, echo_llm());

        let report = h
            .use_case
            .sync(CafeSyncCommand {
                keywords: vec!["나는솔로".to_string(), "나솔".to_string()],
                ..CafeSyncCommand::default()
            })
            .await
            .unwrap();

        assert_eq!(report.saved, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.posts[0].suggested_comment, "저도 궁금했어요 ㅎㅎ");
        assert_eq!(report.posts[0].show_id, "nasolo");

        let progress = h
            .use_case
            .progress(&ProgressId::new(report.progress_id.clone()))
            .await
            .unwrap();
        assert_eq!(progress.status, CrawlStatus::Completed);
        assert_eq!(progress.message, "완료! 2개 게시글 저장됨 (0개 중복 스킵)");
        assert_eq!(h.posts.list_recent(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_sync_skips_duplicates() {
        let mut search = MockCafeSearchPort::new();
        search
            .expect_search()
            .returning(|_, _, _| Ok(vec![cafe_article("9", "환승연애 X 누구", "본문")]));
        let h = harness(search, echo_llm());
        let command = CafeSyncCommand {
            keywords: vec!["환승연애".to_string()],
            ..CafeSyncCommand::default()
        };

        h.use_case.sync(command.clone()).await.unwrap();
        let second = h.use_case.sync(command).await.unwrap();
        assert_eq!(second.saved, 0);
        assert_eq!(second.skipped, 1);
    }

    #[tokio::test]
    async fn limit_stops_collection() {
        let mut search = MockCafeSearchPort::new();
        search.expect_search().times(1).returning(|_, _, _| {
            Ok((1..=5)
                .map(|i| cafe_article(&i.to_string(), "솔로지옥 이야기", "본문"))
                .collect())
        });
        let h = harness(search, echo_llm());
        let report = h
            .use_case
            .sync(CafeSyncCommand {
                limit: Some(3),
                ..CafeSyncCommand::default()
            })
            .await
            .unwrap();
        assert_eq!(report.saved, 3);
    }

    #[tokio::test]
    async fn model_failure_uses_fallback_comment() {
        let mut search = MockCafeSearchPort::new();
        search
            .expect_search()
            .returning(|_, _, _| {
                Ok(vec![
                    cafe_article("5", "돌싱글즈 후기", "본문"),
                    cafe_article("6", "돌싱글즈", ""),
                ])
            });
        let mut llm = MockLlmPort::new();
        llm.expect_generate().times(1).returning(|_| {
            Err(GeminiError::Api {
                status: 429,
                message: "quota".to_string(),
            })
        });
        let h = harness(search, llm);
        let report = h
            .use_case
            .sync(CafeSyncCommand {
                keywords: vec!["돌싱글즈".to_string()],
                ..CafeSyncCommand::default()
            })
            .await
            .unwrap();
        assert_eq!(report.posts[0].suggested_comment, FALLBACK_COMMENT);
        assert_eq!(report.posts[1].suggested_comment, "");
    }

    #[tokio::test]
    async fn search_failure_marks_progress_failed() {
        let mut search = MockCafeSearchPort::new();
        search
            .expect_search()
            .returning(|_, _, _| Err(NaverError::NotConfigured));
        let h = harness(search, MockLlmPort::new());

        let err = h.use_case.sync(CafeSyncCommand::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotConfigured);

        let records = h.progress.all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, CrawlStatus::Failed);
    }

    #[tokio::test]
    async fn unknown_progress_is_not_found() {
        let h = harness(MockCafeSearchPort::new(), MockLlmPort::new());
        let err = h
            .use_case
            .progress(&ProgressId::new("naver_cafe_0"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_reports_missing_posts() {
        let h = harness(MockCafeSearchPort::new(), MockLlmPort::new());
        let err = h
            .use_case
            .delete_post(&CafePostId::new("naver_cafe_1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
