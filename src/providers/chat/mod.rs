//! Chat-completion client.
//!
//! Thin wrapper over an OpenAI-style `/chat/completions` endpoint. The client
//! is created once at startup (credential from the environment) and reused
//! for every query; callers supply the running transcript as context.

pub mod error;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{ChatConfig, API_KEY_ENV};

pub use error::ChatError;

/// One turn of the conversation, in the wire format the completion API uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Client for the chat-completion API.
pub struct ChatClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl ChatClient {
    /// Build a client with the credential taken from `OPENAI_API_KEY`.
    ///
    /// Returns `ChatError::MissingCredential` when the variable is unset so
    /// the caller can degrade to simulation-only answers instead of failing
    /// startup.
    pub fn from_env(config: &ChatConfig) -> Result<Self, ChatError> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| ChatError::MissingCredential)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Send `user_text` with the transcript as context and return the model's
    /// reply. The transcript itself is not mutated here; recording the
    /// exchange is the session's job and only happens on success.
    pub async fn complete(
        &self,
        transcript: &[ChatMessage],
        user_text: &str,
    ) -> Result<String, ChatError> {
        let mut messages = transcript.to_vec();
        messages.push(ChatMessage::user(user_text));

        let request = CompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => truncate(&body, 500),
                Err(_) => String::new(),
            };
            return Err(ChatError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %truncate(&body, 500), "Failed to parse completion response");
            e
        })?;

        extract_reply(completion)
    }
}

/// Pull the first choice's text out of a parsed completion.
fn extract_reply(completion: CompletionResponse) -> Result<String, ChatError> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(ChatError::EmptyResponse)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}
