use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::alerts::{notify, Notice};
use crate::providers::datasets::Stop;
use crate::simulation::{simulate_delay, DelayEvent, SimulationError};

#[derive(Clone)]
pub struct AlertsState {
    pub stops: Arc<Vec<Stop>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertResponse {
    /// The simulated delay, absent when no stops are loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<DelayEvent>,
    pub notices: Vec<Notice>,
}

/// Simulate one delay event and return its notices
#[utoipa::path(
    get,
    path = "/api/alerts",
    responses(
        (status = 200, description = "Simulated delay with tiered notices", body = AlertResponse)
    ),
    tag = "alerts"
)]
pub async fn get_alert(State(state): State<AlertsState>) -> Json<AlertResponse> {
    let mut rng = rand::thread_rng();
    match simulate_delay(&state.stops, &mut rng) {
        Ok(event) => {
            info!(stop = %event.stop_name, delay_minutes = event.delay_minutes, "Simulated delay");
            let notices = notify(&event);
            Json(AlertResponse {
                event: Some(event),
                notices,
            })
        }
        // An empty stop list is not an alert condition; surface it as a
        // plain informational notice instead of an error.
        Err(SimulationError::EmptyStopList) => Json(AlertResponse {
            event: None,
            notices: vec![Notice::info(
                "No bus stops are loaded, so delay alerts are unavailable.",
            )],
        }),
    }
}

pub fn router(stops: Arc<Vec<Stop>>) -> Router {
    let state = AlertsState { stops };
    Router::new().route("/", get(get_alert)).with_state(state)
}
