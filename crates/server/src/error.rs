use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracker::TrackerError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Tracker(TrackerError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            AppError::Tracker(err) => match err {
                TrackerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
                TrackerError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
                TrackerError::InvalidStatusTransition { .. } => (
                    StatusCode::BAD_REQUEST,
                    "invalid_status_transition",
                    err.to_string(),
                ),
                TrackerError::Database(_) => {
                    tracing::error!("Database error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "database_error",
                        "Database error occurred".to_string(),
                    )
                }
                TrackerError::Gamification(_) | TrackerError::Io(_) => {
                    tracing::error!("Tracker error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        err.to_string(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        AppError::Tracker(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(TrackerError::prospect_not_found(Uuid::new_v4())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(TrackerError::Validation("bad".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(TrackerError::InvalidStatusTransition {
                    from: "missed".to_string(),
                    to: "completed".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(TrackerError::Gamification("disk full".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::BadRequest("days must be positive".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
