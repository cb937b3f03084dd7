mod alerts;
mod api;
mod assistant;
mod config;
mod mapview;
mod providers;
mod simulation;

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use assistant::ChatSession;
use config::Config;
use providers::chat::{ChatClient, ChatError};

#[derive(OpenApi)]
#[openapi(
    info(title = "Bus Route Tracker API", version = "0.1.0"),
    paths(
        api::map::map_page,
        api::stops::list_stops,
        api::chat::post_query,
        api::alerts::get_alert,
        api::health::health_check,
    ),
    components(schemas(
        api::ErrorResponse,
        api::stops::StopListResponse,
        api::chat::ChatRequest,
        api::chat::ChatResponse,
        api::alerts::AlertResponse,
        api::health::HealthResponse,
        assistant::Intent,
        alerts::Notice,
        alerts::NoticeLevel,
        providers::datasets::Stop,
        simulation::DelayEvent,
    )),
    tags(
        (name = "map", description = "Stop map"),
        (name = "stops", description = "Loaded stop data"),
        (name = "chat", description = "Conversational assistant"),
        (name = "alerts", description = "Simulated delay alerts"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Best effort; the environment may also provide the key directly.
    _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info,sqlx=warn".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: Either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    // Load the datasets. A missing or malformed input stops the process here,
    // before anything renders.
    let loaded = providers::datasets::load(&config.datasets)
        .await
        .expect("Failed to load datasets");
    if loaded.stops.is_empty() {
        tracing::warn!("Stop snapshot is empty; the map will render without markers");
    }
    let stops = Arc::new(loaded.stops);

    // Chat client: a missing credential degrades the assistant but never
    // fails the loading phase.
    let chat_client = match ChatClient::from_env(&config.chat) {
        Ok(client) => {
            tracing::info!("Chat API credential loaded");
            Some(client)
        }
        Err(ChatError::MissingCredential) => {
            tracing::warn!(
                "{} not set; route and general questions will be unavailable",
                config::API_KEY_ENV
            );
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build chat client; LLM-backed intents unavailable");
            None
        }
    };
    let chat_configured = chat_client.is_some();
    let session = Arc::new(Mutex::new(ChatSession::new(chat_client)));

    // Build the app
    let app = Router::new()
        .merge(api::map::router(stops.clone(), config.map.clone()))
        .nest("/api", api::router(stops, session, chat_configured))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server running on http://{}", config.bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
