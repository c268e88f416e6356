//! Text-generation capability: an OpenRouter-backed [`TextGenerator`] and the
//! [`Assistant`] that turns its replies into validated suggestions, falling
//! back to fixed values whenever generation fails.

mod assistant;
mod error;
mod generator;
mod json;
pub mod openrouter;
pub mod prompts;
mod suggestions;

pub use assistant::{Assistant, DEFAULT_GENERATION_TIMEOUT};
pub use error::{AiError, AiResult};
pub use generator::{OpenRouterGenerator, TextGenerator, UnconfiguredGenerator, DEFAULT_MODEL};
pub use json::extract_json;
pub use suggestions::*;
