//! Chat-completion API client.

use crate::{
    config::UpstreamConfig,
    error::ProxyError,
    types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role},
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Error message used when the upstream error body carries none.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "OpenAI API request failed";

pub struct CompletionClient {
    client: reqwest::Client,
    url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(config: &UpstreamConfig, api_key: &SecretString) -> Result<Self, ProxyError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|_| ProxyError::Configuration("Invalid API key format".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.completions_url(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Send one completion request and return the trimmed text of the first choice.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProxyError> {
        let request = self.build_request(prompt);
        debug!(url = %self.url, model = %self.model, "sending completion request");

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            warn!(%status, %message, "completion API error");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ProxyError::MalformedCompletion(format!("undecodable body: {}", e)))?;

        let content = completion
            .first_content()
            .map(str::trim)
            .ok_or_else(|| ProxyError::MalformedCompletion("no message content".into()))?;

        if content.is_empty() {
            return Err(ProxyError::MalformedCompletion("empty message content".into()));
        }

        Ok(content.to_string())
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// OpenAI nests it as `{"error": {"message": "..."}}`; some compatible servers
/// send `{"error": "..."}` instead.
pub fn extract_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| match e {
            Value::String(s) => Some(s.as_str()),
            other => other.get("message").and_then(|m| m.as_str()),
        })
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(UPSTREAM_FAILURE_MESSAGE)
        .to_string()
}
