//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use pick_server::infrastructure::config::Secret;

use crate::application::dto::{
    AnalyzeReport, CafePostListResponse, CafeSyncReport, CrawlReport, DailyRunReport,
    DraftListResponse, DraftReviewResponse, FixShowIdsReport, ProgressResponse,
};
use crate::application::use_cases::{
    CollectVideosUseCase, DailyAutoMissionUseCase, DraftReviewUseCase, MissionDraftsUseCase,
    NaverCafeSyncUseCase,
};
use crate::domain::shared::{CafePostId, DraftId, ProgressId};
use crate::infrastructure::health::{HealthState, health_routes};

use super::request::{
    AnalyzeRequest, CafeCrawlRequest, CrawlRequest, DailyRunRequest, DeletePostQuery,
    DraftListQuery, ProgressQuery, ScreenRequest,
};
use super::response::{ApiError, ScreenResponse, SuccessResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// YouTube crawl.
    pub collector: Arc<CollectVideosUseCase>,
    /// Screening and draft generation.
    pub drafts: Arc<MissionDraftsUseCase>,
    /// Scheduled crawl-and-draft run.
    pub daily: Arc<DailyAutoMissionUseCase>,
    /// Admin review.
    pub review: Arc<DraftReviewUseCase>,
    /// Naver cafe sync.
    pub cafe: Arc<NaverCafeSyncUseCase>,
    /// Bearer secret of the scheduled run endpoint.
    pub cron_secret: Option<Secret>,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState, health: Arc<HealthState>) -> Router {
    Router::new()
        // YouTube
        .route("/api/youtube/crawl", post(crawl))
        .route("/api/youtube/analyze", post(analyze))
        .route(
            "/api/youtube/run-daily-auto-mission",
            post(run_daily_auto_mission),
        )
        .route("/api/ai/screen-video", post(screen_video))
        // Draft review
        .route("/api/admin/ai-missions", get(list_drafts))
        .route("/api/admin/ai-missions/fix-show-ids", post(fix_show_ids))
        .route("/api/admin/ai-missions/{id}/approve", post(approve_draft))
        .route("/api/admin/ai-missions/{id}/reject", post(reject_draft))
        // Naver cafe
        .route(
            "/api/admin/marketer/naver-cafe/crawl",
            post(cafe_crawl).get(cafe_status).delete(cafe_delete),
        )
        .with_state(state)
        .merge(health_routes(health))
}

// =============================================================================
// YouTube
// =============================================================================

async fn crawl(
    State(state): State<AppState>,
    Json(request): Json<CrawlRequest>,
) -> Result<Json<CrawlReport>, ApiError> {
    let command = request.into_command()?;
    Ok(Json(state.collector.execute(command).await?))
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeReport>, ApiError> {
    Ok(Json(state.drafts.generate(request.into()).await?))
}

async fn screen_video(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> Result<Json<ScreenResponse>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("title이 필요합니다."));
    }
    let verdict = state
        .drafts
        .screen(&request.title, &request.description)
        .await?;
    Ok(Json(ScreenResponse {
        success: true,
        verdict,
    }))
}

/// Bearer check; open when no secret is configured.
fn authorize(headers: &HeaderMap, secret: Option<&Secret>) -> Result<(), ApiError> {
    let Some(secret) = secret else {
        return Ok(());
    };
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if bearer == Some(secret.expose()) {
        Ok(())
    } else {
        tracing::warn!("Daily run rejected: bad credentials");
        Err(ApiError::unauthorized())
    }
}

async fn run_daily_auto_mission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DailyRunRequest>,
) -> Result<Json<DailyRunReport>, ApiError> {
    authorize(&headers, state.cron_secret.as_ref())?;
    let summary = state
        .daily
        .execute(&request.keywords.into_vec(), request.base_url.as_deref())
        .await?;
    Ok(Json(DailyRunReport {
        success: true,
        summary,
    }))
}

// =============================================================================
// Draft review
// =============================================================================

async fn list_drafts(
    State(state): State<AppState>,
    Query(query): Query<DraftListQuery>,
) -> Result<Json<DraftListResponse>, ApiError> {
    let missions = state.review.list(query.status()?).await?;
    Ok(Json(DraftListResponse {
        success: true,
        missions,
    }))
}

async fn approve_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DraftReviewResponse>, ApiError> {
    let mission = state.review.approve(&DraftId::new(id)).await?;
    Ok(Json(DraftReviewResponse {
        success: true,
        mission,
    }))
}

async fn reject_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DraftReviewResponse>, ApiError> {
    let mission = state.review.reject(&DraftId::new(id)).await?;
    Ok(Json(DraftReviewResponse {
        success: true,
        mission,
    }))
}

async fn fix_show_ids(State(state): State<AppState>) -> Result<Json<FixShowIdsReport>, ApiError> {
    Ok(Json(state.review.fix_show_ids().await?))
}

// =============================================================================
// Naver cafe
// =============================================================================

async fn cafe_crawl(
    State(state): State<AppState>,
    body: Option<Json<CafeCrawlRequest>>,
) -> Result<Json<CafeSyncReport>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    Ok(Json(state.cafe.sync(request.into_command()?).await?))
}

/// Poll a progress record, or list recent posts without `progressId`.
async fn cafe_status(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Response, ApiError> {
    match query.progress_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            let progress = state.cafe.progress(&ProgressId::new(id)).await?;
            Ok(Json(ProgressResponse {
                success: true,
                progress,
            })
            .into_response())
        }
        None => {
            let posts = state.cafe.recent_posts().await?;
            Ok(Json(CafePostListResponse {
                success: true,
                posts,
            })
            .into_response())
        }
    }
}

async fn cafe_delete(
    State(state): State<AppState>,
    Query(query): Query<DeletePostQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return Err(ApiError::bad_request("id가 필요합니다."));
    };
    state.cafe.delete_post(&CafePostId::new(id)).await?;
    Ok(Json(SuccessResponse::ok()))
}
