//! Daily Auto Mission Use Case
//!
//! Crawl, screen and draft for every keyword. A failure on one keyword or
//! one video is logged and the run moves on.

use std::sync::Arc;
use std::time::Instant;

use pick_server::application::ports::AutoMissionSummary;

use super::{CollectVideosUseCase, MissionDraftsUseCase};
use crate::application::dto::{AnalyzeCommand, CrawlCommand};
use crate::domain::video::Video;
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Use case for the scheduled crawl-and-draft run.
pub struct DailyAutoMissionUseCase {
    collector: Arc<CollectVideosUseCase>,
    drafts: Arc<MissionDraftsUseCase>,
    max_results: u32,
    hours_back: i64,
}

impl DailyAutoMissionUseCase {
    /// Create a new `DailyAutoMissionUseCase`.
    pub const fn new(
        collector: Arc<CollectVideosUseCase>,
        drafts: Arc<MissionDraftsUseCase>,
        max_results: u32,
        hours_back: i64,
    ) -> Self {
        Self {
            collector,
            drafts,
            max_results,
            hours_back,
        }
    }

    /// Run the pipeline for `keywords`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when no keyword is given.
    pub async fn execute(
        &self,
        keywords: &[String],
        base_url: Option<&str>,
    ) -> Result<AutoMissionSummary, ServiceError> {
        let keywords: Vec<&String> = keywords.iter().filter(|k| !k.trim().is_empty()).collect();
        if keywords.is_empty() {
            return Err(ServiceError::invalid("keywords가 필요합니다."));
        }
        let started = Instant::now();
        tracing::info!(keywords = keywords.len(), base_url, "Daily auto-mission run started");

        let mut summary = AutoMissionSummary::default();
        for keyword in keywords {
            let command = CrawlCommand {
                keywords: vec![keyword.clone()],
                max_results: self.max_results,
                hours_back: self.hours_back,
            };
            let videos = match self.collector.execute(command).await {
                Ok(report) => report.videos,
                Err(e) => {
                    tracing::warn!(keyword = %keyword, error = %e, "Crawl failed, skipping keyword");
                    continue;
                }
            };
            summary.total_collected += videos.len() as u64;

            for video in &videos {
                let created = self.process_video(video).await;
                if let Some(created) = created {
                    summary.total_screened += 1;
                    summary.total_missions_created += created as u64;
                }
            }
        }

        metrics::record_daily_run(started.elapsed().as_secs_f64());
        tracing::info!(
            collected = summary.total_collected,
            screened = summary.total_screened,
            created = summary.total_missions_created,
            "Daily auto-mission run finished"
        );
        Ok(summary)
    }

    /// Screen and draft one video. Returns the drafts created when it passed.
    async fn process_video(&self, video: &Video) -> Option<usize> {
        let snapshot = &video.snapshot;
        let verdict = match self.drafts.screen(&snapshot.title, &snapshot.description).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(video_id = %snapshot.video_id, error = %e, "Screening failed");
                return None;
            }
        };
        if !verdict.vote_worthy {
            tracing::debug!(video_id = %snapshot.video_id, reason = %verdict.reason, "Video not vote-worthy");
            return None;
        }

        let command = AnalyzeCommand {
            video_id: snapshot.video_id.to_string(),
            title: snapshot.title.clone(),
            description: snapshot.description.clone(),
            channel_name: snapshot.channel_name.clone(),
            channel_id: snapshot.channel_id.to_string(),
            keyword: Some(video.keyword.clone()),
        };
        match self.drafts.generate(command).await {
            Ok(report) => Some(report.saved_count),
            Err(e) => {
                tracing::warn!(video_id = %snapshot.video_id, error = %e, "Draft generation failed");
                Some(0)
            }
        }
    }
}
