use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::providers::datasets::Stop;

#[derive(Clone)]
pub struct StopsState {
    pub stops: Arc<Vec<Stop>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StopListResponse {
    pub stops: Vec<Stop>,
}

/// List the stop snapshot loaded at startup
#[utoipa::path(
    get,
    path = "/api/stops",
    responses(
        (status = 200, description = "All loaded stops", body = StopListResponse)
    ),
    tag = "stops"
)]
pub async fn list_stops(State(state): State<StopsState>) -> Json<StopListResponse> {
    Json(StopListResponse {
        stops: state.stops.as_ref().clone(),
    })
}

pub fn router(stops: Arc<Vec<Stop>>) -> Router {
    let state = StopsState { stops };
    Router::new().route("/", get(list_stops)).with_state(state)
}
