use prospect_core::CoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Database error: {0}")]
    Database(#[from] db::DbError),

    #[error("Gamification error: {0}")]
    Gamification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    pub fn prospect_not_found(id: Uuid) -> Self {
        Self::NotFound(format!("prospect {}", id))
    }

    pub fn follow_up_not_found(id: Uuid) -> Self {
        Self::NotFound(format!("follow-up {}", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<CoreError> for TrackerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProspectNotFound(id) => Self::prospect_not_found(id),
            CoreError::FollowUpNotFound(id) => Self::follow_up_not_found(id),
            CoreError::InvalidStatusTransition { from, to } => {
                Self::InvalidStatusTransition { from, to }
            }
            CoreError::Validation(message) => Self::Validation(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
