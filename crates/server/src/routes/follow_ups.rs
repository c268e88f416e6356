use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use prospect_core::{CreateFollowUpRequest, FollowUp, UpdateFollowUpRequest};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UpcomingQuery {
    /// Days ahead of today to include; defaults to the configured window.
    pub days: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/follow-ups",
    responses(
        (status = 200, description = "All follow-ups by date and time", body = Vec<FollowUp>)
    ),
    tag = "follow-ups"
)]
pub async fn list_follow_ups(State(state): State<AppState>) -> Result<Json<Vec<FollowUp>>, AppError> {
    let follow_ups = state.service.list_follow_ups().await?;
    Ok(Json(follow_ups))
}

#[utoipa::path(
    post,
    path = "/api/follow-ups",
    request_body = CreateFollowUpRequest,
    responses(
        (status = 201, description = "Follow-up scheduled", body = FollowUp),
        (status = 400, description = "Invalid follow-up"),
        (status = 404, description = "Prospect not found")
    ),
    tag = "follow-ups"
)]
pub async fn create_follow_up(
    State(state): State<AppState>,
    Json(payload): Json<CreateFollowUpRequest>,
) -> Result<(StatusCode, Json<FollowUp>), AppError> {
    let follow_up = state.service.add_follow_up(payload).await?;
    Ok((StatusCode::CREATED, Json(follow_up)))
}

#[utoipa::path(
    get,
    path = "/api/follow-ups/upcoming",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Pending follow-ups from today through the window", body = Vec<FollowUp>)
    ),
    tag = "follow-ups"
)]
pub async fn list_upcoming_follow_ups(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Vec<FollowUp>>, AppError> {
    let days = query
        .days
        .unwrap_or(state.config.tracker.upcoming_window_days);
    let follow_ups = state.service.list_upcoming_follow_ups(days).await?;
    Ok(Json(follow_ups))
}

#[utoipa::path(
    get,
    path = "/api/follow-ups/{id}",
    params(
        ("id" = Uuid, Path, description = "Follow-up ID")
    ),
    responses(
        (status = 200, description = "Follow-up found", body = FollowUp),
        (status = 404, description = "Follow-up not found")
    ),
    tag = "follow-ups"
)]
pub async fn get_follow_up(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FollowUp>, AppError> {
    let follow_up = state.service.get_follow_up(id).await?;
    Ok(Json(follow_up))
}

#[utoipa::path(
    patch,
    path = "/api/follow-ups/{id}",
    params(
        ("id" = Uuid, Path, description = "Follow-up ID")
    ),
    request_body = UpdateFollowUpRequest,
    responses(
        (status = 200, description = "Follow-up updated", body = FollowUp),
        (status = 400, description = "Invalid update or status transition"),
        (status = 404, description = "Follow-up not found")
    ),
    tag = "follow-ups"
)]
pub async fn update_follow_up(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFollowUpRequest>,
) -> Result<Json<FollowUp>, AppError> {
    let follow_up = state.service.update_follow_up(id, payload).await?;
    Ok(Json(follow_up))
}

#[utoipa::path(
    delete,
    path = "/api/follow-ups/{id}",
    params(
        ("id" = Uuid, Path, description = "Follow-up ID")
    ),
    responses(
        (status = 204, description = "Follow-up deleted"),
        (status = 404, description = "Follow-up not found")
    ),
    tag = "follow-ups"
)]
pub async fn delete_follow_up(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.delete_follow_up(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
