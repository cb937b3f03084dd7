use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::api::{error_response, ErrorResponse};
use crate::assistant::{self, AssistantError, Intent, SharedSession};
use crate::providers::datasets::Stop;

#[derive(Clone)]
pub struct ChatState {
    pub stops: Arc<Vec<Stop>>,
    pub session: SharedSession,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Free-text question: an arrival lookup, a "from ... to ..." route
    /// request, or anything else.
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub intent: Intent,
    pub reply: String,
}

/// Answer one rider query
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Classified intent and reply", body = ChatResponse),
        (status = 502, description = "Chat-completion call failed", body = ErrorResponse),
        (status = 503, description = "No API credential configured", body = ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn post_query(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session.lock().await;

    match assistant::route_query(&mut session, &request.query, &state.stops).await {
        Ok(answer) => Ok(Json(ChatResponse {
            intent: answer.intent,
            reply: answer.reply,
        })),
        Err(err @ AssistantError::LlmUnavailable) => {
            warn!("Chat query rejected: {err}");
            Err(error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string()))
        }
        Err(AssistantError::Chat(err)) => {
            warn!(error = %err, "Chat-completion call failed");
            Err(error_response(StatusCode::BAD_GATEWAY, err.to_string()))
        }
    }
}

pub fn router(stops: Arc<Vec<Stop>>, session: SharedSession) -> Router {
    let state = ChatState { stops, session };
    Router::new().route("/", post(post_query)).with_state(state)
}
