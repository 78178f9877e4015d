//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use crate::application::dto::{
    CommentDto, MatchResultsDto, MissionDto, MissionResultsDto, PickReceiptDto, PointLogDto,
    RankingEntryDto, ReplyDto, SettlementDto, TopVoterDto, UserDto,
};
use crate::application::use_cases::{
    CommentsUseCase, CronJobsUseCase, DEFAULT_HISTORY_LIMIT, DEFAULT_INBOX_LIMIT,
    DEFAULT_RANKING_LIMIT, DEFAULT_TOP_VOTERS, MissionsUseCase, NotificationsUseCase,
    PreferencesUpdate, ResultsUseCase, SendMissionNotificationUseCase, SettleMissionUseCase,
    SubmitPickUseCase, UsersUseCase,
};
use crate::domain::comment::LikeToggle;
use crate::domain::mission::MissionFilter;
use crate::domain::notification::{Notification, NotificationPreferences};
use crate::domain::shared::{CommentId, MissionId, NotificationId, ReplyId, UserId};
use crate::infrastructure::config::Secret;
use crate::infrastructure::health::{HealthState, health_routes};

use super::cron;
use super::request::{
    ActorRequest, AnswerRequest, ContentRequest, CreateMissionRequest, CreateUserRequest,
    EpisodeStatusRequest, FinalAnswerRequest, LimitQuery, ListMissionsQuery, MatchResultsQuery,
    PreferencesRequest, SubmitMatchPickRequest, SubmitPickRequest, UpdateUserRequest, ViewerQuery,
};
use super::response::{ApiError, MarkAllReadResponse, SuccessResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Mission creation and lookup.
    pub missions: Arc<MissionsUseCase>,
    /// Pick submission.
    pub picks: Arc<SubmitPickUseCase>,
    /// Tallies and results.
    pub results: Arc<ResultsUseCase>,
    /// Answers and episode settlement.
    pub settlement: Arc<SettleMissionUseCase>,
    /// Profiles and ranking.
    pub users: Arc<UsersUseCase>,
    /// Comment threads.
    pub comments: Arc<CommentsUseCase>,
    /// Inbox and preferences.
    pub notifications: Arc<NotificationsUseCase>,
    /// Mission notification dispatch.
    pub dispatcher: Arc<SendMissionNotificationUseCase>,
    /// Scheduled jobs.
    pub cron: Arc<CronJobsUseCase>,
    /// Shared secret of the cron endpoints.
    pub cron_secret: Option<Secret>,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState, health: Arc<HealthState>) -> Router {
    Router::new()
        // Missions
        .route("/api/v1/missions", post(create_mission).get(list_missions))
        .route("/api/v1/missions/{id}", get(get_mission))
        .route("/api/v1/missions/{id}/picks", post(submit_pick))
        .route("/api/v1/missions/{id}/match-picks", post(submit_match_pick))
        .route("/api/v1/missions/{id}/results", get(mission_results))
        .route("/api/v1/missions/{id}/match-results", get(match_results))
        .route(
            "/api/v1/missions/{id}/answer",
            post(submit_answer).put(update_answer),
        )
        .route("/api/v1/missions/{id}/final-answer", post(settle_match))
        .route(
            "/api/v1/missions/{id}/episodes/{no}",
            put(update_episode_status),
        )
        .route("/api/v1/missions/{id}/top-voters", get(top_voters))
        // Comments
        .route(
            "/api/v1/missions/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/api/v1/comments/{id}", delete(delete_comment))
        .route("/api/v1/comments/{id}/replies", post(create_reply))
        .route("/api/v1/comments/{id}/like", post(toggle_comment_like))
        .route("/api/v1/replies/{id}", delete(delete_reply))
        .route("/api/v1/replies/{id}/like", post(toggle_reply_like))
        // Users
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/{id}", get(get_user).patch(update_user))
        .route("/api/v1/users/{id}/points", get(point_history))
        .route("/api/v1/ranking", get(ranking))
        // Notifications
        .route("/api/v1/users/{id}/notifications", get(list_notifications))
        .route(
            "/api/v1/users/{id}/notifications/read-all",
            post(mark_all_read),
        )
        .route(
            "/api/v1/users/{id}/notification-preferences",
            get(get_preferences).put(update_preferences),
        )
        .route("/api/v1/notifications/{id}/read", post(mark_read))
        // Dispatch and cron
        .route(
            "/api/send-mission-notification",
            post(cron::send_mission_notification),
        )
        .route(
            "/api/cron/daily-auto-mission",
            get(cron::daily_auto_mission),
        )
        .route(
            "/api/cron/daily-mission-notification",
            get(cron::daily_mission_notification),
        )
        .route(
            "/api/cron/match-episode-open",
            get(cron::match_episode_open),
        )
        .route("/api/cron/deadline-sweep", get(cron::deadline_sweep))
        .with_state(state)
        .merge(health_routes(health))
}

// =============================================================================
// Missions
// =============================================================================

async fn create_mission(
    State(state): State<AppState>,
    Json(request): Json<CreateMissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = request.into_command()?;
    let mission = state.missions.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(mission)))
}

async fn list_missions(
    State(state): State<AppState>,
    Query(query): Query<ListMissionsQuery>,
) -> Result<Json<Vec<MissionDto>>, ApiError> {
    let filter = MissionFilter::from(query);
    Ok(Json(state.missions.list(&filter).await?))
}

async fn get_mission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MissionDto>, ApiError> {
    Ok(Json(state.missions.get(&MissionId::new(id)).await?))
}

async fn submit_pick(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitPickRequest>,
) -> Result<Json<PickReceiptDto>, ApiError> {
    let receipt = state
        .picks
        .submit_pick(
            &MissionId::new(id),
            &UserId::new(request.user_id),
            &request.selected_option,
        )
        .await?;
    Ok(Json(receipt))
}

async fn submit_match_pick(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitMatchPickRequest>,
) -> Result<Json<PickReceiptDto>, ApiError> {
    let receipt = state
        .picks
        .submit_match_pick(
            &MissionId::new(id),
            &UserId::new(request.user_id),
            request.episode_no,
            request.pairs,
        )
        .await?;
    Ok(Json(receipt))
}

async fn mission_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MissionResultsDto>, ApiError> {
    Ok(Json(state.results.results(&MissionId::new(id)).await?))
}

async fn match_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchResultsQuery>,
) -> Result<Json<MatchResultsDto>, ApiError> {
    let filter = query.filter()?;
    Ok(Json(
        state
            .results
            .match_results(&MissionId::new(id), &filter)
            .await?,
    ))
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SettlementDto>, ApiError> {
    let settlement = state
        .settlement
        .submit_answer(
            &MissionId::new(id),
            &UserId::new(request.user_id),
            &request.answer,
        )
        .await?;
    Ok(Json(settlement))
}

async fn update_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<MissionDto>, ApiError> {
    let mission = state
        .settlement
        .update_answer(
            &MissionId::new(id),
            &UserId::new(request.user_id),
            &request.answer,
        )
        .await?;
    Ok(Json(mission))
}

async fn settle_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<FinalAnswerRequest>,
) -> Result<Json<SettlementDto>, ApiError> {
    let settlement = state
        .settlement
        .settle_match(
            &MissionId::new(id),
            &UserId::new(request.user_id),
            &request.final_answer,
        )
        .await?;
    Ok(Json(settlement))
}

async fn update_episode_status(
    State(state): State<AppState>,
    Path((id, episode_no)): Path<(String, u32)>,
    Json(request): Json<EpisodeStatusRequest>,
) -> Result<Json<SettlementDto>, ApiError> {
    let settlement = state
        .settlement
        .update_episode_status(&MissionId::new(id), episode_no, request.status)
        .await?;
    Ok(Json(settlement))
}

async fn top_voters(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TopVoterDto>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_VOTERS);
    Ok(Json(
        state.users.top_voters(&MissionId::new(id), limit).await?,
    ))
}

// =============================================================================
// Comments
// =============================================================================

async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<CommentDto>>, ApiError> {
    let viewer = query.user_id.map(UserId::new);
    Ok(Json(
        state
            .comments
            .list(&MissionId::new(id), viewer.as_ref())
            .await?,
    ))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .comments
        .create_comment(
            &MissionId::new(id),
            &UserId::new(request.user_id),
            &request.content,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn create_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ContentRequest>,
) -> Result<(StatusCode, Json<ReplyDto>), ApiError> {
    let reply = state
        .comments
        .create_reply(
            &CommentId::new(id),
            &UserId::new(request.user_id),
            &request.content,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(actor): Query<ActorRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .comments
        .delete_comment(&CommentId::new(id), &UserId::new(actor.user_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn delete_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(actor): Query<ActorRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .comments
        .delete_reply(&ReplyId::new(id), &UserId::new(actor.user_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn toggle_comment_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(actor): Json<ActorRequest>,
) -> Result<Json<LikeToggle>, ApiError> {
    Ok(Json(
        state
            .comments
            .toggle_comment_like(&CommentId::new(id), &UserId::new(actor.user_id))
            .await?,
    ))
}

async fn toggle_reply_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(actor): Json<ActorRequest>,
) -> Result<Json<LikeToggle>, ApiError> {
    Ok(Json(
        state
            .comments
            .toggle_reply_like(&ReplyId::new(id), &UserId::new(actor.user_id))
            .await?,
    ))
}

// =============================================================================
// Users
// =============================================================================

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state.users.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(state.users.get(&UserId::new(id)).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .users
        .update_profile(
            &UserId::new(id),
            request.nickname.as_deref(),
            request.avatar_url,
        )
        .await?;
    Ok(Json(user))
}

async fn point_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<PointLogDto>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(
        state.users.point_history(&UserId::new(id), limit).await?,
    ))
}

async fn ranking(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<RankingEntryDto>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RANKING_LIMIT);
    Ok(Json(state.users.ranking(limit).await?))
}

// =============================================================================
// Notifications
// =============================================================================

async fn list_notifications(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_INBOX_LIMIT);
    Ok(Json(
        state.notifications.list(&UserId::new(id), limit).await?,
    ))
}

async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(actor): Json<ActorRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .notifications
        .mark_read(&NotificationId::new(id), &UserId::new(actor.user_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn mark_all_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = state.notifications.mark_all_read(&UserId::new(id)).await?;
    Ok(Json(MarkAllReadResponse {
        success: true,
        updated,
    }))
}

async fn get_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NotificationPreferences>, ApiError> {
    Ok(Json(
        state.notifications.preferences(&UserId::new(id)).await?,
    ))
}

async fn update_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PreferencesRequest>,
) -> Result<Json<NotificationPreferences>, ApiError> {
    let update = PreferencesUpdate::try_from(request)?;
    Ok(Json(
        state
            .notifications
            .update_preferences(&UserId::new(id), update)
            .await?,
    ))
}
