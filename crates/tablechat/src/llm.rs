//! Completion model client.
//!
//! Speaks the OpenAI-compatible chat-completions protocol against a
//! configurable base URL, so the same client covers Gemini's compatibility
//! endpoint, OpenAI, or a local llama-server. One prompt in, one completion
//! out; throttling surfaces as a typed `RateLimited` value, never as text to
//! be pattern-matched.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::PipelineError;

/// Synchronous text-completion seam between the pipeline and the provider.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, PipelineError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

pub struct LlmClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl LlmClient {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.llm_base_url.clone(),
            config.llm_model.clone(),
            config.llm_api_key.clone(),
            Duration::from_secs(config.llm_timeout_seconds),
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, PipelineError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let mut builder = self.http_client.post(self.completions_url()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PipelineError::Model(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            warn!("model provider returned 429 (retry-after: {:?})", retry_after);
            return Err(PipelineError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Model(format!(
                "backend returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Model(format!("unparseable response: {}", e)))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.clone())
            .unwrap_or_default();
        debug!("model returned {} chars", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> LlmClient {
        LlmClient::new(
            server.url(),
            "test-model".to_string(),
            None,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_completions_url_joins_without_double_slash() {
        let client = LlmClient::new(
            "http://localhost:8081/v1/".to_string(),
            "m".to_string(),
            None,
            Duration::from_secs(1),
        );
        assert_eq!(
            client.completions_url(),
            "http://localhost:8081/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"SELECT 1"}}]}"#,
            )
            .create_async()
            .await;

        let out = client_for(&server).complete("question").await.unwrap();
        assert_eq!(out, "SELECT 1");
    }

    #[tokio::test]
    async fn test_429_becomes_typed_rate_limit_with_delay() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let err = client_for(&server).complete("question").await.unwrap_err();
        match err {
            PipelineError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_429_without_header_has_no_suggested_delay() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let err = client_for(&server).complete("question").await.unwrap_err();
        match err {
            PipelineError::RateLimited { retry_after } => assert_eq!(retry_after, None),
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_a_model_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("backend exploded")
            .create_async()
            .await;

        let err = client_for(&server).complete("question").await.unwrap_err();
        match err {
            PipelineError::Model(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("backend exploded"));
            }
            other => panic!("expected Model, got {:?}", other),
        }
    }
}
