//! Collect Videos Use Case
//!
//! Searches recent uploads per keyword, keeps the relevant ones and stores
//! what is new together with the channels that posted them.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Duration;

use crate::application::dto::{CrawlCommand, CrawlReport, MAX_HOURS_BACK};
use crate::application::ports::YouTubePort;
use crate::domain::shared::{ChannelId, Timestamp};
use crate::domain::video::{Channel, ChannelRepository, Video, VideoRepository, is_relevant};
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Search results requested per kept video.
const SEARCH_OVERFETCH: u32 = 5;

/// Largest page the search API serves.
const SEARCH_PAGE_MAX: u32 = 50;

/// Use case for the YouTube crawl.
pub struct CollectVideosUseCase {
    youtube: Arc<dyn YouTubePort>,
    videos: Arc<dyn VideoRepository>,
    channels: Arc<dyn ChannelRepository>,
}

impl CollectVideosUseCase {
    /// Create a new `CollectVideosUseCase`.
    pub const fn new(
        youtube: Arc<dyn YouTubePort>,
        videos: Arc<dyn VideoRepository>,
        channels: Arc<dyn ChannelRepository>,
    ) -> Self {
        Self {
            youtube,
            videos,
            channels,
        }
    }

    /// Crawl every keyword and store the new videos.
    ///
    /// # Errors
    ///
    /// Returns error if no keyword is given, the search fails or storage fails.
    pub async fn execute(&self, command: CrawlCommand) -> Result<CrawlReport, ServiceError> {
        let keywords: Vec<&str> = command
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(ServiceError::invalid("keywords가 필요합니다."));
        }
        let now = Timestamp::now();

        // 1. Purge expired videos
        let expired_deleted = self.videos.delete_expired(now).await?;

        // 2. Search each keyword
        let hours_back = command.hours_back.clamp(1, MAX_HOURS_BACK);
        let published_after = now.plus(Duration::hours(-hours_back));
        let per_search = (command.max_results.max(1) * SEARCH_OVERFETCH).min(SEARCH_PAGE_MAX);
        let mut found: Vec<Video> = Vec::new();
        let mut seen = HashSet::new();
        for keyword in keywords {
            let mut hits = self
                .youtube
                .search_videos(keyword, published_after, per_search)
                .await?;
            hits.retain(|v| is_relevant(keyword, &v.title, &v.description));
            hits.sort_by(|a, b| b.view_count.cmp(&a.view_count));
            hits.truncate(command.max_results as usize);

            tracing::info!(keyword, relevant = hits.len(), "YouTube search finished");
            for hit in hits {
                if seen.insert(hit.video_id.clone()) {
                    found.push(Video::collect(hit, keyword, now));
                }
            }
        }
        let total_found = found.len();

        // 3. Drop videos already stored
        let ids: Vec<_> = found.iter().map(|v| v.id().clone()).collect();
        let existing = self.videos.existing_ids(&ids).await?;
        found.retain(|v| !existing.contains(v.id()));
        let skipped_existing = total_found - found.len();

        if found.is_empty() {
            return Ok(CrawlReport {
                success: true,
                videos: Vec::new(),
                total_found,
                skipped_existing,
                expired_deleted,
                message: "모든 영상이 이미 DB에 존재합니다.".to_string(),
            });
        }

        // 4. Upsert channels
        self.upsert_channels(&found, now).await?;

        // 5. Store videos
        self.videos.save_all(&found).await?;
        for video in &found {
            metrics::record_videos_crawled(&video.keyword, 1);
        }
        tracing::info!(
            stored = found.len(),
            skipped = skipped_existing,
            expired = expired_deleted,
            "Crawl stored new videos"
        );

        Ok(CrawlReport {
            success: true,
            message: format!("{}개의 새 영상을 저장했습니다.", found.len()),
            videos: found,
            total_found,
            skipped_existing,
            expired_deleted,
        })
    }

    async fn upsert_channels(&self, videos: &[Video], now: Timestamp) -> Result<(), ServiceError> {
        let mut discovered: BTreeMap<ChannelId, Channel> = BTreeMap::new();
        for video in videos {
            discovered
                .entry(video.snapshot.channel_id.clone())
                .and_modify(|c| {
                    c.video_count += 1;
                    c.keywords.insert(video.keyword.clone());
                })
                .or_insert_with(|| Channel::discovered(&video.snapshot, &video.keyword, now));
        }

        for (id, channel) in discovered {
            let merged = match self.channels.find_by_id(&id).await? {
                Some(mut stored) => {
                    stored.merge(&channel);
                    stored
                }
                None => channel,
            };
            self.channels.save(&merged).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockYouTubePort, YouTubeError};
    use crate::application::use_cases::test_support::snapshot;
    use crate::domain::shared::VideoId;
    use crate::error::ErrorCode;
    use crate::infrastructure::persistence::{InMemoryChannelRepository, InMemoryVideoRepository};

    struct Harness {
        use_case: CollectVideosUseCase,
        videos: Arc<InMemoryVideoRepository>,
        channels: Arc<InMemoryChannelRepository>,
    }

    fn harness(youtube: MockYouTubePort) -> Harness {
        let videos = Arc::new(InMemoryVideoRepository::new());
        let channels = Arc::new(InMemoryChannelRepository::new());
        Harness {
            use_case: CollectVideosUseCase::new(Arc::new(youtube), videos.clone(), channels.clone()),
            videos,
            channels,
        }
    }

    #[tokio::test]
    async fn keeps_relevant_videos_by_views() {
        let mut youtube = MockYouTubePort::new();
        youtube
            .expect_search_videos()
            .withf(|keyword, _, max| keyword == "나는솔로" && *max == 10)
            .returning(|_, _, _| {
                Ok(vec![
                    snapshot("low", "나는솔로 24기 옥순", "ch1", 10),
                    snapshot("high", "나는 솔로 최종 선택", "ch1", 900),
                    snapshot("mid", "나솔 영수 근황", "ch2", 300),
                    snapshot("off", "솔로지옥 나는솔로 비교", "ch3", 5000),
                    snapshot("noise", "오늘의 먹방", "ch4", 10_000),
                ])
            });
        let h = harness(youtube);

        let report = h
            .use_case
            .execute(CrawlCommand {
                keywords: vec!["나는솔로".to_string()],
                max_results: 2,
                hours_back: 24,
            })
            .await
            .unwrap();

        let ids: Vec<_> = report.videos.iter().map(|v| v.id().as_str().to_string()).collect();
        assert_eq!(ids, ["high", "mid"]);
        assert!(h.videos.find_by_id(&VideoId::new("high")).await.unwrap().is_some());
        assert!(h.channels.find_by_id(&ChannelId::new("ch2")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn oversized_window_is_capped_at_thirty_days() {
        let earliest = Timestamp::now().plus(Duration::hours(-MAX_HOURS_BACK - 1));
        let mut youtube = MockYouTubePort::new();
        youtube
            .expect_search_videos()
            .withf(move |_, after, _| *after > earliest)
            .returning(|_, _, _| Ok(Vec::new()));
        let h = harness(youtube);

        let report = h
            .use_case
            .execute(CrawlCommand {
                keywords: vec!["나는솔로".to_string()],
                max_results: 2,
                hours_back: 9_000_000_000_000,
            })
            .await
            .unwrap();
        assert!(report.videos.is_empty());
    }

    #[tokio::test]
    async fn second_crawl_reports_nothing_new() {
        let mut youtube = MockYouTubePort::new();
        youtube
            .expect_search_videos()
            .times(2)
            .returning(|_, _, _| Ok(vec![snapshot("v1", "최강야구 직관", "ch1", 50)]));
        let h = harness(youtube);
        let command = CrawlCommand::with_defaults(vec!["최강야구".to_string()]);

        let first = h.use_case.execute(command.clone()).await.unwrap();
        assert_eq!(first.videos.len(), 1);

        let second = h.use_case.execute(command).await.unwrap();
        assert!(second.videos.is_empty());
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(second.message, "모든 영상이 이미 DB에 존재합니다.");
    }

    #[tokio::test]
    async fn channels_accumulate_keywords() {
        let mut youtube = MockYouTubePort::new();
        youtube.expect_search_videos().returning(|keyword, _, _| {
            let id = if keyword == "나솔" { "a" } else { "b" };
            Ok(vec![snapshot(id, "나솔 나솔사계 근황", "shared", 1)])
        });
        let h = harness(youtube);

        h.use_case
            .execute(CrawlCommand::with_defaults(vec![
                "나솔".to_string(),
                "나솔사계".to_string(),
            ]))
            .await
            .unwrap();

        let channel = h
            .channels
            .find_by_id(&ChannelId::new("shared"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(channel.keywords.len(), 2);
        assert_eq!(channel.video_count, 2);
    }

    #[tokio::test]
    async fn blank_keywords_are_rejected() {
        let h = harness(MockYouTubePort::new());
        let err = h
            .use_case
            .execute(CrawlCommand::with_defaults(vec![" ".to_string()]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let mut youtube = MockYouTubePort::new();
        youtube
            .expect_search_videos()
            .returning(|_, _, _| Err(YouTubeError::NotConfigured));
        let h = harness(youtube);
        let err = h
            .use_case
            .execute(CrawlCommand::with_defaults(vec!["나는솔로".to_string()]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotConfigured);
    }
}
