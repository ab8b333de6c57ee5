//! OpenAI-compatible Completion Service adapter.
//!
//! Works against any chat-completions endpoint: Google Gemini's OpenAI-compatible API (default),
//! OpenAI, Azure OpenAI, local Ollama. Implements `CompletionPort`.

use crate::domain::{CompletionConfig, CompletionError, DomainError};
use crate::ports::CompletionPort;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Gemini's OpenAI-compatible chat completions endpoint.
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

/// How much of an error body ends up in the error message.
const ERROR_BODY_EXCERPT: usize = 200;

/// OpenAI-compatible completion adapter.
///
/// The reqwest client owns connection pooling and the transport timeout. No retries here:
/// a failed call is reported once, with its kind.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl OpenAiAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Chat completions endpoint
    /// * `api_key` - Bearer token (can be empty for local Ollama)
    /// * `request_timeout` - Transport timeout for a whole request
    pub fn new(
        api_url: String,
        api_key: String,
        request_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request_body(prompt: &str, config: &CompletionConfig) -> ChatRequest {
        ChatRequest {
            model: config.model_id().to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        }
    }
}

/// Classify a non-success HTTP status.
fn error_for_status(status: StatusCode, body: &str) -> CompletionError {
    let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::QuotaExceeded(excerpt),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CompletionError::Timeout,
        _ => CompletionError::ServiceUnavailable(format!("API error {}: {}", status, excerpt)),
    }
}

fn error_for_transport(e: &reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::ServiceUnavailable(format!("HTTP request failed: {}", e))
    }
}

/// Chat completions request.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completions response (only the fields we read).
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

fn first_content(response: ChatResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::InvalidResponse("No response choices returned".into()))
}

#[async_trait::async_trait]
impl CompletionPort for OpenAiAdapter {
    async fn complete(
        &self,
        prompt: &str,
        config: &CompletionConfig,
    ) -> Result<String, CompletionError> {
        info!(
            model = %config.model_id(),
            prompt_len = prompt.len(),
            "sending prompt to completion service"
        );

        let request = Self::request_body(prompt, config);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| error_for_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "completion API returned error");
            return Err(error_for_status(status, &text));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout
            } else {
                CompletionError::InvalidResponse(format!("Failed to parse API response: {}", e))
            }
        })?;

        let content = first_content(chat_response)?;
        debug!(completion_len = content.len(), "received completion");
        Ok(content)
    }
}
