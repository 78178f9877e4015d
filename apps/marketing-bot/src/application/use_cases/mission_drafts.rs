//! Mission Drafts Use Case
//!
//! Screens a video for vote-worthiness and turns it into pending mission
//! drafts tied to a catalog show.

use std::sync::Arc;

use pick_server::domain::catalog::ShowCategory;

use crate::application::dto::{AnalyzeCommand, AnalyzeReport};
use crate::application::ports::LlmPort;
use crate::application::prompts::{
    DraftProposal, ScreeningVerdict, draft_prompt, parse_drafts, parse_screening,
    screening_prompt,
};
use crate::domain::draft::{DraftRepository, MissionDraft, ShowMatch, SourceVideo, detect_show, resolve_show};
use crate::domain::shared::{Timestamp, VideoId};
use crate::error::{ErrorCode, ServiceError};
use crate::infrastructure::metrics;

/// Show used when neither the text nor the model names a known one.
pub const FALLBACK_SHOW_ID: &str = "nasolo";

/// Use case for screening and drafting.
pub struct MissionDraftsUseCase {
    llm: Arc<dyn LlmPort>,
    drafts: Arc<dyn DraftRepository>,
}

impl MissionDraftsUseCase {
    /// Create a new `MissionDraftsUseCase`.
    pub const fn new(llm: Arc<dyn LlmPort>, drafts: Arc<dyn DraftRepository>) -> Self {
        Self { llm, drafts }
    }

    /// Ask the model whether viewers would vote on the video.
    ///
    /// # Errors
    ///
    /// Returns error if the model call fails.
    pub async fn screen(
        &self,
        title: &str,
        description: &str,
    ) -> Result<ScreeningVerdict, ServiceError> {
        let reply = self
            .llm
            .generate(&screening_prompt(title, description))
            .await?;
        let verdict = parse_screening(&reply);
        metrics::record_screening(verdict.vote_worthy);
        tracing::debug!(title, vote_worthy = verdict.vote_worthy, reason = %verdict.reason, "Video screened");
        Ok(verdict)
    }

    /// Generate and store drafts for a video.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` without video id or title, `UpstreamFailed`
    /// when the model yields no usable mission.
    pub async fn generate(&self, command: AnalyzeCommand) -> Result<AnalyzeReport, ServiceError> {
        // 1. Validate
        if command.video_id.trim().is_empty() || command.title.trim().is_empty() {
            return Err(ServiceError::invalid("videoId와 title이 필요합니다."));
        }

        // 2. Ask the model
        let prompt = draft_prompt(
            &command.title,
            &command.description,
            command.keyword.as_deref(),
        );
        let reply = self.llm.generate(&prompt).await?;
        let proposals = parse_drafts(&reply);
        if proposals.is_empty() {
            return Err(ServiceError::new(
                ErrorCode::UpstreamFailed,
                "미션 생성에 실패했습니다. Gemini 응답을 확인해주세요.",
            ));
        }

        // 3. Resolve the show and store
        let detected = detect_video_show(&command);
        let now = Timestamp::now();
        let mut missions = Vec::with_capacity(proposals.len());
        for proposal in &proposals {
            let show = detected.unwrap_or_else(|| model_show(proposal));
            let source = SourceVideo::new(
                VideoId::new(command.video_id.trim()),
                command.title.clone(),
                command.description.clone(),
                command.channel_name.clone(),
                command.channel_id.clone(),
            );
            let draft =
                MissionDraft::generated(proposal.content(), show.show_id, show.category, source, now)?;
            self.drafts.save(&draft).await?;
            missions.push(draft);
        }

        metrics::record_drafts(missions.len());
        tracing::info!(
            video_id = %command.video_id,
            drafts = missions.len(),
            "Mission drafts stored"
        );

        Ok(AnalyzeReport {
            success: true,
            saved_to_db: true,
            saved_count: missions.len(),
            missions,
        })
    }
}

/// Show named by the crawl keyword, else by the video text.
fn detect_video_show(command: &AnalyzeCommand) -> Option<ShowMatch> {
    command
        .keyword
        .as_deref()
        .and_then(|k| detect_show(k, "", ""))
        .or_else(|| detect_show(&command.title, &command.channel_name, &command.description))
}

/// Show suggested by the model, checked against the catalog.
fn model_show(proposal: &DraftProposal) -> ShowMatch {
    proposal
        .show_id
        .as_deref()
        .and_then(resolve_show)
        .unwrap_or(ShowMatch {
            show_id: FALLBACK_SHOW_ID,
            category: ShowCategory::Love,
        })
}
