pub mod alerts;
pub mod chat;
pub mod error;
pub mod health;
pub mod map;
pub mod stops;

pub use error::{error_response, ErrorResponse};

use std::sync::Arc;

use axum::Router;

use crate::assistant::SharedSession;
use crate::providers::datasets::Stop;

pub fn router(
    stops: Arc<Vec<Stop>>,
    session: SharedSession,
    chat_configured: bool,
) -> Router {
    Router::new()
        .nest("/stops", stops::router(stops.clone()))
        .nest("/chat", chat::router(stops.clone(), session))
        .nest("/alerts", alerts::router(stops.clone()))
        .nest("/health", health::router(stops, chat_configured))
}
