use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, error, info, warn};

use super::types::*;
use crate::error::{AiError, AiResult};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

const DEFAULT_MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 8000;

/// Client for the OpenRouter chat completions API
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl OpenRouterClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retries rate limits and 5xx responses with exponential backoff.
    async fn with_retry<T, F, Fut>(&self, operation: F, operation_name: &str) -> AiResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AiResult<T>>,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let wait_ms = match operation().await {
                Ok(result) => return Ok(result),
                Err(AiError::RateLimited { retry_after }) if retries < self.max_retries => retry_after
                    .map(|s| s * 1000)
                    .unwrap_or(backoff_ms)
                    .min(MAX_BACKOFF_MS),
                Err(AiError::OpenRouterApi {
                    status_code: Some(code),
                    ..
                }) if code >= 500 && retries < self.max_retries => backoff_ms,
                Err(e) => {
                    if retries > 0 {
                        info!("{} failed after {} retries: {}", operation_name, retries, e);
                    }
                    return Err(e);
                }
            };

            warn!(
                "{} failed transiently, retrying in {}ms (attempt {}/{})",
                operation_name,
                wait_ms,
                retries + 1,
                self.max_retries
            );

            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            retries += 1;
            backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
        }
    }

    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> AiResult<String> {
        self.with_retry(
            || async {
                self.chat_completion_inner(messages.clone(), model, temperature, max_tokens)
                    .await
            },
            "chat_completion",
        )
        .await
    }

    async fn chat_completion_inner(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> AiResult<String> {
        debug!(
            "Creating chat completion with {} messages, model {}",
            messages.len(),
            model
        );

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
            response_format: Some(ResponseFormat::json_object()),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::OpenRouterApi {
                message: "No completion returned".to_string(),
                status_code: None,
            })
    }
}

async fn check_status(response: Response) -> AiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        warn!("Rate limited by OpenRouter");
        return Err(AiError::RateLimited { retry_after });
    }

    let error_text = response.text().await.unwrap_or_default();

    if let Ok(error_resp) = serde_json::from_str::<OpenRouterError>(&error_text) {
        error!(
            "OpenRouter API error: {} (type: {:?})",
            error_resp.error.message, error_resp.error.error_type
        );
        return Err(AiError::OpenRouterApi {
            message: error_resp.error.message,
            status_code: Some(status.as_u16()),
        });
    }

    Err(AiError::OpenRouterApi {
        message: error_text,
        status_code: Some(status.as_u16()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "gen-1",
            "model": "openai/gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        })
    }

    #[test]
    fn test_client_creation_trims_base_url() {
        let client = OpenRouterClient::new("test-key".to_string(), format!("{}/", DEFAULT_BASE_URL));
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_chat_completion_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new("secret".to_string(), server.uri());
        let text = client
            .chat_completion(vec![ChatMessage::user("hi")], "openai/gpt-4o-mini", None, None)
            .await
            .unwrap();

        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "Invalid API key", "code": 401}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new("bad".to_string(), server.uri());
        let err = client
            .chat_completion(vec![ChatMessage::user("hi")], "m", None, None)
            .await
            .unwrap_err();

        match err {
            AiError::OpenRouterApi {
                message,
                status_code,
            } => {
                assert_eq!(message, "Invalid API key");
                assert_eq!(status_code, Some(401));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .expect(2)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new("key".to_string(), server.uri()).with_max_retries(1);
        let err = client
            .chat_completion(vec![ChatMessage::user("hi")], "m", None, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AiError::OpenRouterApi {
                status_code: Some(503),
                ..
            }
        ));
    }
}
