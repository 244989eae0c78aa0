//! Generation client: one prompt, one credential, one bounded call.

use std::time::Duration;

use async_trait::async_trait;

use super::config::AiConfig;
use super::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
};
use crate::credentials::Credential;
use crate::error::ProviderError;

/// Longest slice of an error body kept in a `ProviderError`.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Trait for generation backends, enabling fakes in tests.
///
/// Implementations report every failure as a `ProviderError`; callers decide
/// what to do with it.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send `prompt` using `credential` and return the raw completion text.
    async fn complete(
        &self,
        prompt: &str,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<String, ProviderError>;

    /// Get the model name (e.g., "google/gemini-2.0-flash-001").
    fn model_name(&self) -> &str;
}

/// Client for OpenRouter or any other OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a client for `model` served at `base_url`.
    ///
    /// `request_timeout` bounds each HTTP exchange at the transport level.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.base_url.clone(), config.model.clone(), config.timeout)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn send(&self, prompt: &str, credential: &Credential) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(credential.expose())
            .header("X-Title", "Harvest")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::new(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::new(format!("failed to read response body: {}", e)))?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate(&body));
            return Err(ProviderError::new(format!("HTTP {}: {}", status, message)));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::new(format!("invalid completion body: {}", e)))?;

        if let Some(error) = completion.error {
            return Err(ProviderError::new(format!("provider error: {}", error.message)));
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::new("completion contained no text"))
    }
}

#[async_trait]
impl GenerationClient for OpenRouterClient {
    async fn complete(
        &self,
        prompt: &str,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        tracing::debug!(model = %self.model, "Calling generation API");

        match tokio::time::timeout(timeout, self.send(prompt, credential)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::new(format!(
                "request timed out after {}s",
                timeout.as_secs_f32()
            ))),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}
