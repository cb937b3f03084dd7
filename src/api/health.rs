use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::providers::datasets::Stop;

#[derive(Clone)]
pub struct HealthState {
    pub stops: Arc<Vec<Stop>>,
    pub chat_configured: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Whether the startup load produced a non-empty stop snapshot
    pub stops_loaded: bool,
    /// Number of stops in the snapshot
    pub stop_count: usize,
    /// Whether a chat-completion credential was configured
    pub chat_configured: bool,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        stops_loaded: !state.stops.is_empty(),
        stop_count: state.stops.len(),
        chat_configured: state.chat_configured,
    })
}

pub fn router(stops: Arc<Vec<Stop>>, chat_configured: bool) -> Router {
    let state = HealthState {
        stops,
        chat_configured,
    };
    Router::new().route("/", get(health_check)).with_state(state)
}
