//! Chat completion client for support messages.
//!
//! This module provides a small blocking client for an OpenAI-style
//! `/v1/chat/completions` endpoint authenticated with a bearer token.

use super::prompts::{parse_support_reply, support_prompt};
use super::SupportGenerator;
use crate::config::Config;
use crate::constants::{CHAT_MAX_TOKENS, CHAT_TEMPERATURE, CHAT_TIMEOUT_SECS, REDACTED_PLACEHOLDER};
use crate::errors::{AIError, AppResult};
use crate::mood_core::{Mood, SupportMessage};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user, assistant)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: u32,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Client for an OpenAI-compatible chat completion API.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED_PLACEHOLDER))
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiClient {
    /// Creates a client with a request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL without the `/v1/...` path (e.g., "https://api.openai.com")
    /// * `api_key` - Bearer credential; `None` makes every request fail with `MissingApiKey`
    /// * `model` - Chat model name (e.g., "gpt-3.5-turbo")
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> AppResult<Self> {
        let timeout = Duration::from_secs(CHAT_TIMEOUT_SECS);
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(AIError::Request)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            client,
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.api_base.clone(),
            config.api_key.clone(),
            config.model.clone(),
        )
    }

    /// Sends a chat completion request and returns the first choice's content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is configured
    /// - The endpoint is not reachable or times out
    /// - The endpoint answers with a non-success status
    /// - The body is not a chat completion or has no choices
    pub fn chat(&self, messages: &[Message]) -> AppResult<String> {
        let api_key = self.api_key.as_deref().ok_or(AIError::MissingApiKey)?;
        debug!("Sending chat request with model: {}", self.model);

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(AIError::Request)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(AIError::Http { status, body }.into());
        }

        let chat_response: ChatResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AIError::InvalidResponse("Response had no choices".to_string()))?;

        debug!("Received chat response ({} chars)", content.len());
        Ok(content)
    }
}

impl SupportGenerator for OpenAiClient {
    fn generate(&self, mood: &Mood, note: Option<&str>) -> AppResult<SupportMessage> {
        let messages = support_prompt(mood, note);
        let content = self.chat(&messages)?;
        Ok(parse_support_reply(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_message_constructors() {
        let system = Message::system("You are a helpful assistant");
        assert_eq!(system.role, "system");
        assert_eq!(system.content, "You are a helpful assistant");

        let user = Message::user("Hello");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "Hello");
    }

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = OpenAiClient::new("http://localhost:8080/", None, "gpt-3.5-turbo").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_api_key_fails_before_network() {
        let client = OpenAiClient::new("http://127.0.0.1:9", None, "gpt-3.5-turbo").unwrap();
        let result = client.chat(&[Message::user("hi")]);
        assert!(matches!(result, Err(AppError::AI(AIError::MissingApiKey))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OpenAiClient::new(
            "https://api.openai.com",
            Some("sk-secret".to_string()),
            "gpt-3.5-turbo",
        )
        .unwrap();
        let debug_output = format!("{:?}", client);
        assert!(!debug_output.contains("sk-secret"));
        assert!(debug_output.contains(REDACTED_PLACEHOLDER));
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::system("s"), Message::user("u")];
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 150);
    }
}
