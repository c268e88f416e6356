use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Prospect not found: {0}")]
    ProspectNotFound(Uuid),

    #[error("Follow-up not found: {0}")]
    FollowUpNotFound(Uuid),

    #[error("Invalid follow-up status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
