use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prospect_core::{
    CreateInteractionRequest, CreateProspectRequest, FollowUp, Prospect, UpdateProspectRequest,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/prospects",
    responses(
        (status = 200, description = "All prospects, newest first", body = Vec<Prospect>)
    ),
    tag = "prospects"
)]
pub async fn list_prospects(State(state): State<AppState>) -> Result<Json<Vec<Prospect>>, AppError> {
    let prospects = state.service.list_prospects().await?;
    Ok(Json(prospects))
}

#[utoipa::path(
    post,
    path = "/api/prospects",
    request_body = CreateProspectRequest,
    responses(
        (status = 201, description = "Prospect created", body = Prospect),
        (status = 400, description = "Invalid prospect")
    ),
    tag = "prospects"
)]
pub async fn create_prospect(
    State(state): State<AppState>,
    Json(payload): Json<CreateProspectRequest>,
) -> Result<(StatusCode, Json<Prospect>), AppError> {
    let prospect = state.service.create_prospect(payload).await?;
    Ok((StatusCode::CREATED, Json(prospect)))
}

#[utoipa::path(
    get,
    path = "/api/prospects/{id}",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    responses(
        (status = 200, description = "Prospect found", body = Prospect),
        (status = 404, description = "Prospect not found")
    ),
    tag = "prospects"
)]
pub async fn get_prospect(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prospect>, AppError> {
    let prospect = state.service.get_prospect(id).await?;
    Ok(Json(prospect))
}

#[utoipa::path(
    patch,
    path = "/api/prospects/{id}",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    request_body = UpdateProspectRequest,
    responses(
        (status = 200, description = "Prospect updated", body = Prospect),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Prospect not found")
    ),
    tag = "prospects"
)]
pub async fn update_prospect(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProspectRequest>,
) -> Result<Json<Prospect>, AppError> {
    let prospect = state.service.update_prospect(id, payload).await?;
    Ok(Json(prospect))
}

#[utoipa::path(
    delete,
    path = "/api/prospects/{id}",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    responses(
        (status = 204, description = "Prospect and its follow-ups deleted"),
        (status = 404, description = "Prospect not found")
    ),
    tag = "prospects"
)]
pub async fn delete_prospect(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.delete_prospect(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/prospects/{id}/interactions",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    request_body = CreateInteractionRequest,
    responses(
        (status = 201, description = "Interaction logged, updated prospect returned", body = Prospect),
        (status = 400, description = "Invalid interaction"),
        (status = 404, description = "Prospect not found")
    ),
    tag = "prospects"
)]
pub async fn add_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateInteractionRequest>,
) -> Result<(StatusCode, Json<Prospect>), AppError> {
    let prospect = state.service.add_interaction(id, payload).await?;
    Ok((StatusCode::CREATED, Json(prospect)))
}

#[utoipa::path(
    get,
    path = "/api/prospects/{id}/follow-ups",
    params(
        ("id" = Uuid, Path, description = "Prospect ID")
    ),
    responses(
        (status = 200, description = "Follow-ups of the prospect by date and time", body = Vec<FollowUp>),
        (status = 404, description = "Prospect not found")
    ),
    tag = "prospects"
)]
pub async fn list_prospect_follow_ups(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FollowUp>>, AppError> {
    let follow_ups = state.service.list_follow_ups_for_prospect(id).await?;
    Ok(Json(follow_ups))
}
