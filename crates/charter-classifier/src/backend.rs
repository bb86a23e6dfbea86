//! Completion transport.
//!
//! [`CompletionBackend`] is the seam between prompt/validation logic and the
//! network. [`AnthropicBackend`] speaks the Messages API over reqwest; tests
//! substitute scripted backends.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::ClassifierError;
use crate::prompt::CompletionRequest;

/// Default provider base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// API version header value.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Sends a built request and returns the raw text the model produced.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError>;
}

/// Connection settings for [`AnthropicBackend`].
#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Base URL; `/v1/messages` is appended.
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    /// Transport-level timeout for one request.
    pub request_timeout: Duration,
}

impl BackendSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Messages API client.
#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    client: Client,
    url: String,
    api_key: String,
    api_version: String,
}

impl AnthropicBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ClassifierError> {
        if settings.api_key.trim().is_empty() {
            return Err(ClassifierError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClassifierError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/v1/messages", settings.endpoint.trim_end_matches('/')),
            api_key: settings.api_key,
            api_version: settings.api_version,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ClassifierError::Unavailable(transport_message(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClassifierError::Unavailable(transport_message(&e)))?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        debug!(bytes = text.len(), "Provider response received");
        extract_text(&text)
    }
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

/// Maps a non-success status to the error class the orchestrator acts on.
fn status_error(status: StatusCode, body: &str) -> ClassifierError {
    let message = truncate(body, MAX_ERROR_BODY);
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ClassifierError::Unavailable(format!("HTTP {}: {}", status.as_u16(), message))
    } else {
        ClassifierError::ProviderRejected {
            status: status.as_u16(),
            message,
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Pulls the first text block out of a Messages API envelope.
fn extract_text(envelope: &str) -> Result<String, ClassifierError> {
    let value: Value = serde_json::from_str(envelope).map_err(|e| {
        ClassifierError::ResponseInvalid(format!("provider envelope is not JSON: {}", e))
    })?;

    let blocks = value["content"].as_array().ok_or_else(|| {
        ClassifierError::ResponseInvalid("provider envelope has no content array".to_string())
    })?;

    blocks
        .iter()
        .find(|block| block["type"] == "text")
        .and_then(|block| block["text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ClassifierError::ResponseInvalid("provider envelope has no text block".to_string())
        })
}
