//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`start_server`] loads configuration, builds the assistant client and the
//! relay service, registers routes through [`create_router`], and serves until
//! Ctrl-C.

// region: --- Imports
use crate::bridge::{ChatForwarder, HttpForwarder};
use crate::handlers;
use crate::middleware::{log_requests, stamp_req, RequestStamp};
use crate::services::RelayService;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use lib_assistant::{AssistantApi, OpenAiClient};
use lib_core::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
    pub forwarder: Arc<dyn ChatForwarder>,
}

impl AppState {
    pub fn new(relay: Arc<RelayService>, forwarder: Arc<dyn ChatForwarder>) -> Self {
        Self { relay, forwarder }
    }
}

impl axum::extract::FromRef<AppState> for Arc<RelayService> {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn ChatForwarder> {
    fn from_ref(state: &AppState) -> Self {
        state.forwarder.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Overrides applied on top of the environment configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080"); `BIND_ADDRESS` when `None`
    pub bind_address: Option<String>,
    /// Allowed CORS origins; `ALLOWED_ORIGINS` when `None`
    pub allowed_origins: Option<Vec<String>>,
}

impl ServerConfig {
    fn apply(self, config: &mut Config) {
        if let Some(bind_address) = self.bind_address {
            config.override_bind_address(bind_address);
        }
        if let Some(allowed_origins) = self.allowed_origins {
            config.allowed_origins = allowed_origins;
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Install the global tracing subscriber using `LOG_LEVEL` (default `info`).
pub fn init_tracing() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();
    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {}", e))?;

    info!(" Log level: {}", log_level);
    Ok(())
}

/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Required environment variables are missing or invalid
/// - The upload directory cannot be created
/// - The HTTP clients cannot be built
/// - Server binding fails
pub async fn start_server(overrides: ServerConfig) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    info!(" ASSISTANT RELAY STARTING");

    info!("Loading configuration...");
    let mut config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    overrides.apply(&mut config);
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    info!("{:?}", config);

    if !config.upload_dir.exists() {
        std::fs::create_dir_all(&config.upload_dir)?;
        info!("Created upload directory: {:?}", config.upload_dir);
    }

    let api: Arc<dyn AssistantApi> = Arc::new(OpenAiClient::from_config(&config)?);
    let relay = Arc::new(RelayService::from_config(api, &config));
    let forwarder: Arc<dyn ChatForwarder> = Arc::new(HttpForwarder::from_config(&config)?);
    info!(" Assistant client ready (assistant {})", config.assistant_id);

    let state = AppState::new(relay, forwarder);
    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!(" SERVER READY: http://{}", config.bind_address);
    log_server_info(&config);

    // ConnectInfo is needed by the WebSocket handler
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(" Server stopped");
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, config: &Config) -> Router {
    info!("[ROUTE SETUP] Registering HTTP routes...");
    let mut app = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route(
            "/api/upload",
            post(handlers::upload::upload).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/health", get(|| async { "OK" }));

    if config.realtime_enabled() {
        app = app.route("/api/ws", get(handlers::websocket::realtime_websocket));
    } else {
        info!("[ROUTE SETUP] Realtime channel disabled in {}", config.app_env);
    }

    app.fallback(|| async {
        info!("[404 HANDLER] Unmatched route - returning 404");
        (axum::http::StatusCode::NOT_FOUND, "Route not found")
    })
    .with_state(state)
    .layer(axum::middleware::from_fn(log_requests))
    .layer(
        tower_http::trace::TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestStamp>()
                    .map(|s| s.id.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            })
            .on_failure(
                |error: tower_http::classify::ServerErrorsFailureClass,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    tracing::error!(
                        error = ?error,
                        latency_ms = latency.as_millis(),
                        "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                        error,
                        latency.as_millis()
                    );
                },
            ),
    )
    // Outermost so every other layer sees the request ID
    .layer(axum::middleware::from_fn(stamp_req))
    .layer(cors_layer(&config.allowed_origins))
}

/// Build the CORS layer; a `*` entry allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::HeaderName::from_static("x-request-id"),
        ])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!(" Shutdown signal received");
}

/// Log server information
fn log_server_info(config: &Config) {
    info!(" CHAT:");
    info!("   • POST /api/chat      {{\"message\": \"...\"}}");
    info!(" FILES:");
    info!("   • POST /api/upload    multipart field \"file\"");
    if config.realtime_enabled() {
        info!(" REALTIME:");
        info!("   • GET  /api/ws        {{\"event\": \"sendMessage\", \"data\": \"...\"}}");
    }
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
