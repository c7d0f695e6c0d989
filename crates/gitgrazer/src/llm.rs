// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Chat-completion client
//!
//! [`CompletionClient`] is the seam between the change describer and the
//! text-generation service. [`OpenAiClient`] talks to any endpoint that
//! speaks the OpenAI chat completions wire format.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Failure to obtain generated text
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Completion API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the service, or the raw body
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Malformed completion response: {0}")]
    Malformed(String),
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the assistant
    System,
    /// The request itself
    User,
}

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A request to generate a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    /// The model identifier
    pub model: String,
    /// Ordered conversation to complete
    pub messages: Vec<ChatMessage>,
}

/// Generated text plus usage metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionResponse {
    /// Text of the first choice
    pub text: String,
    /// Prompt tokens consumed, when reported
    pub prompt_tokens: Option<u32>,
    /// Completion tokens generated, when reported
    pub completion_tokens: Option<u32>,
}

/// Sends completion requests to a language model
pub trait CompletionClient {
    /// Generate a completion, blocking until the service answers
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the request fails for any reason.
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, GenerationError>;
}

/// Blocking client for OpenAI-compatible chat completions
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client for `api_base` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Transport` if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

/// Top-level chat completions response
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Error envelope returned on non-success statuses
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, GenerationError> {
        debug!(model = %request.model, messages = request.messages.len(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_chat_response(&body)
    }
}

/// Extract the first choice's text from a chat completions body
///
/// # Errors
///
/// Returns `GenerationError::Malformed` if the body is not valid JSON of the
/// expected shape or carries no choices.
pub fn parse_chat_response(body: &str) -> Result<CompletionResponse, GenerationError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GenerationError::Malformed("response has no choices".to_string()))?;

    Ok(CompletionResponse {
        text,
        prompt_tokens: parsed.usage.as_ref().map(|u| u.prompt_tokens),
        completion_tokens: parsed.usage.as_ref().map(|u| u.completion_tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_request_wire_format() {
        let request = CompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage::system("be terse"), ChatMessage::user("hi")],
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be terse"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Adds a parser."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;
        let response = parse_chat_response(body).expect("parse");
        assert_eq!(response.text, "Adds a parser.");
        assert_eq!(response.prompt_tokens, Some(12));
        assert_eq!(response.completion_tokens, Some(4));
    }

    #[test]
    fn test_parse_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let response = parse_chat_response(body).expect("parse");
        assert_eq!(response.text, "ok");
        assert_eq!(response.prompt_tokens, None);
    }

    #[test]
    fn test_parse_empty_choices_is_malformed() {
        let result = parse_chat_response(r#"{"choices": []}"#);
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let result = parse_chat_response("<html>bad gateway</html>");
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = OpenAiClient::new("http://localhost:9/v1/", "key", Duration::from_secs(1))
            .expect("client");
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is closed on test machines
        let client = OpenAiClient::new("http://127.0.0.1:9/v1", "key", Duration::from_secs(2))
            .expect("client");
        let request = CompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage::user("hi")],
        };
        let result = client.complete(&request);
        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }
}
