use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::config::MapConfig;
use crate::mapview;
use crate::providers::datasets::Stop;

#[derive(Clone)]
pub struct MapState {
    pub stops: Arc<Vec<Stop>>,
    pub config: MapConfig,
}

/// Serve the stop map with the chat panel and alert surface.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Map page with one marker per stop, up to the configured cap", body = String, content_type = "text/html")
    ),
    tag = "map"
)]
pub async fn map_page(State(state): State<MapState>) -> Html<String> {
    Html(mapview::render_page(&state.stops, &state.config))
}

pub fn router(stops: Arc<Vec<Stop>>, config: MapConfig) -> Router {
    let state = MapState { stops, config };
    Router::new().route("/", get(map_page)).with_state(state)
}
