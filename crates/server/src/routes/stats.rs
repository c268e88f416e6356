use axum::extract::{Query, State};
use axum::Json;
use prospect_core::{AccountabilitySummary, GamificationStats};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AccountabilityQuery {
    /// Trailing window in days; defaults to the configured window.
    pub days: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/stats/gamification",
    responses(
        (status = 200, description = "Current gamification counters", body = GamificationStats)
    ),
    tag = "stats"
)]
pub async fn gamification_stats(
    State(state): State<AppState>,
) -> Result<Json<GamificationStats>, AppError> {
    let stats = state.service.gamification_stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/stats/accountability",
    params(AccountabilityQuery),
    responses(
        (status = 200, description = "Activity over the trailing window", body = AccountabilitySummary),
        (status = 400, description = "Window must be at least one day")
    ),
    tag = "stats"
)]
pub async fn accountability_summary(
    State(state): State<AppState>,
    Query(query): Query<AccountabilityQuery>,
) -> Result<Json<AccountabilitySummary>, AppError> {
    let days = query
        .days
        .unwrap_or(state.config.tracker.accountability_window_days);
    if days == 0 {
        return Err(AppError::BadRequest(
            "days must be at least 1".to_string(),
        ));
    }

    let summary = state.service.accountability_summary(days).await?;
    Ok(Json(summary))
}
