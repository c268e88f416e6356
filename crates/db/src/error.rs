use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Prospect not found: {0}")]
    ProspectNotFound(Uuid),

    #[error("Follow-up not found: {0}")]
    FollowUpNotFound(Uuid),

    #[error("Invalid {table} row {id}: {reason}")]
    InvalidRow {
        table: &'static str,
        id: String,
        reason: String,
    },
}

impl DbError {
    pub(crate) fn invalid_row(table: &'static str, id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            table,
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
