//! Generated suggestions. These never fail on generation errors; the
//! fallback value is returned instead.

use ai::{
    MessageSuggestion, MessageSuggestionRequest, ScheduleSuggestion, ScheduleSuggestionRequest,
    ToolSuggestions,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prospect_core::FollowUp;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/prospects/{id}/suggestions/message",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    request_body = MessageSuggestionRequest,
    responses(
        (status = 200, description = "Suggested follow-up message", body = MessageSuggestion),
        (status = 404, description = "Prospect not found")
    ),
    tag = "suggestions"
)]
pub async fn suggest_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MessageSuggestionRequest>,
) -> Result<Json<MessageSuggestion>, AppError> {
    let suggestion = state
        .service
        .suggest_message(id, payload.follow_up_number)
        .await?;
    Ok(Json(suggestion))
}

#[utoipa::path(
    post,
    path = "/api/prospects/{id}/suggestions/schedule",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    request_body = ScheduleSuggestionRequest,
    responses(
        (status = 200, description = "Suggested follow-up schedule", body = ScheduleSuggestion),
        (status = 404, description = "Prospect not found")
    ),
    tag = "suggestions"
)]
pub async fn suggest_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleSuggestionRequest>,
) -> Result<Json<ScheduleSuggestion>, AppError> {
    let suggestion = state
        .service
        .suggest_schedule(id, payload.user_preferences.as_deref())
        .await?;
    Ok(Json(suggestion))
}

#[utoipa::path(
    post,
    path = "/api/prospects/{id}/suggestions/tools",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    responses(
        (status = 200, description = "Three suggested sales tools", body = ToolSuggestions),
        (status = 404, description = "Prospect not found")
    ),
    tag = "suggestions"
)]
pub async fn suggest_tools(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToolSuggestions>, AppError> {
    let tools = state.service.suggest_tools(id).await?;
    Ok(Json(tools))
}

#[utoipa::path(
    post,
    path = "/api/prospects/{id}/schedule/apply",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    request_body = ScheduleSuggestion,
    responses(
        (status = 201, description = "Follow-ups created from the schedule's future entries", body = Vec<FollowUp>),
        (status = 404, description = "Prospect not found")
    ),
    tag = "suggestions"
)]
pub async fn apply_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleSuggestion>,
) -> Result<(StatusCode, Json<Vec<FollowUp>>), AppError> {
    let created = state.service.apply_schedule(id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
