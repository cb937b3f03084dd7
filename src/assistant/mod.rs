//! Conversational assistant.
//!
//! Classifies each free-text query into one of three intents and dispatches
//! it: arrival lookups are answered from the simulator without touching the
//! language model, route requests and general questions go to the
//! chat-completion client with the running transcript as context.
//!
//! The matching here is deliberately naive and is kept bug-for-bug: the first
//! stop whose name appears anywhere in the query wins, and route endpoints
//! are extracted by splitting on the literal substrings "from" and "to", so
//! words that merely contain them ("Acton") will confuse it.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::providers::chat::{ChatClient, ChatError, ChatMessage};
use crate::providers::datasets::Stop;
use crate::simulation;

/// Session state shared by the chat handlers: one transcript and one client
/// handle for the life of the process.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// The classified purpose of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    ArrivalLookup { stop_name: String },
    RouteRequest { from_stop: String, to_stop: String },
    General,
}

/// A dispatched query's result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Answer {
    pub intent: Intent,
    pub reply: String,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("the language model is unavailable: no API credential was configured")]
    LlmUnavailable,
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Classify `user_text` against the stop snapshot.
///
/// Order matters: a mentioned stop name always wins, then the "from ... to
/// ..." pattern, then general. Stop matching is first-match in snapshot
/// order, not longest-match.
pub fn classify_intent(user_text: &str, stops: &[Stop]) -> Intent {
    let lowered = user_text.to_lowercase();

    for stop in stops {
        if lowered.contains(&stop.stop_name.to_lowercase()) {
            return Intent::ArrivalLookup {
                stop_name: stop.stop_name.clone(),
            };
        }
    }

    if let Some((_, after_from)) = lowered.split_once("from") {
        if let Some((from_part, to_part)) = after_from.split_once("to") {
            return Intent::RouteRequest {
                from_stop: from_part.trim().to_string(),
                to_stop: to_part.trim().to_string(),
            };
        }
    }

    Intent::General
}

/// The running conversation: transcript plus an optional client handle.
///
/// The client is `None` when no API credential was configured at startup; in
/// that state LLM-backed intents fail with `LlmUnavailable` while arrival
/// lookups keep working.
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    client: Option<ChatClient>,
}

impl ChatSession {
    pub fn new(client: Option<ChatClient>) -> Self {
        Self {
            transcript: Vec::new(),
            client,
        }
    }

    pub fn transcript_len(&self) -> usize {
        self.transcript.len()
    }

    /// Send `prompt` with the transcript as context.
    ///
    /// The exchange is appended to the transcript only when the call
    /// succeeds; a failed turn leaves the transcript exactly as it was.
    async fn ask(&mut self, prompt: &str) -> Result<String, AssistantError> {
        let client = self.client.as_ref().ok_or(AssistantError::LlmUnavailable)?;
        let reply = client.complete(&self.transcript, prompt).await?;

        self.transcript.push(ChatMessage::user(prompt));
        self.transcript.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }
}

/// Classify and dispatch one user query.
pub async fn route_query(
    session: &mut ChatSession,
    user_text: &str,
    stops: &[Stop],
) -> Result<Answer, AssistantError> {
    let intent = classify_intent(user_text, stops);

    let reply = match &intent {
        Intent::ArrivalLookup { stop_name } => {
            let mut rng = rand::thread_rng();
            simulation::estimate_arrival(stop_name, &mut rng)
        }
        Intent::RouteRequest { from_stop, to_stop } => {
            let prompt = format!(
                "Find the best bus route from {from_stop} to {to_stop} considering any delays."
            );
            session.ask(&prompt).await?
        }
        Intent::General => session.ask(user_text).await?,
    };

    Ok(Answer { intent, reply })
}
