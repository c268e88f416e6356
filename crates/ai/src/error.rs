use thiserror::Error;

/// Failures of the text-generation capability. None of these reach callers of
/// [`crate::Assistant`]'s infallible methods; they are logged and replaced by
/// fallback values.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("OpenRouter API error: {message}")]
    OpenRouterApi {
        message: String,
        status_code: Option<u16>,
    },

    #[error("OpenRouter rate limited, retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    #[error("Generated output failed validation: {0}")]
    InvalidOutput(String),

    #[error("No text generator configured")]
    NotConfigured,
}

impl AiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }
}

pub type AiResult<T> = Result<T, AiError>;
