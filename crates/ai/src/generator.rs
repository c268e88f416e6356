use async_trait::async_trait;

use crate::error::{AiError, AiResult};
use crate::openrouter::{ChatMessage, OpenRouterClient};

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Anything that can turn a system prompt and a user prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, prompt: &str) -> AiResult<String>;
}

/// [`TextGenerator`] backed by OpenRouter chat completions.
pub struct OpenRouterGenerator {
    client: OpenRouterClient,
    model: String,
    temperature: Option<f32>,
}

impl OpenRouterGenerator {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: Some(0.7),
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenRouterGenerator {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, system: &str, prompt: &str) -> AiResult<String> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(prompt)];
        self.client
            .chat_completion(messages, &self.model, self.temperature, Some(1024))
            .await
    }
}

/// Stand-in used when no API key is available; every call fails so each flow
/// serves its fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> AiResult<String> {
        Err(AiError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_unconfigured_always_fails() {
        let err = UnconfiguredGenerator.complete("sys", "hi").await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }

    #[tokio::test]
    async fn test_openrouter_generator_sends_system_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "gen-2",
                "model": "test/model",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "{}"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new("key".to_string(), server.uri());
        let generator = OpenRouterGenerator::new(client, "test/model");

        assert_eq!(generator.complete("be brief", "hello").await.unwrap(), "{}");
        assert_eq!(generator.name(), "openrouter");
    }
}
