//! Costwise API Server implementation
//!
//! HTTP REST API server using Axum. Wraps the same calculation core as the
//! CLI and MCP server; the only process-wide state is the report store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::report::ReportStore;

use super::handlers;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Backing file for the short-id report store; None keeps it in memory.
    pub store_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            store_path: None,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub store: ReportStore,
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "costwise_server=info,tower_http=info".into()),
        )
        .init();

    let store = match &config.store_path {
        Some(path) => ReportStore::with_path(path.clone()),
        None => ReportStore::new(),
    };
    let state = Arc::new(AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        store,
    });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Core API endpoints
        .route("/api/v1/calculate", post(handlers::calculate))
        .route("/api/v1/break-even", post(handlers::break_even))
        .route("/api/v1/investor", post(handlers::investor))
        .route("/api/v1/report/encode", post(handlers::encode_report))
        .route("/api/v1/report/decode", post(handlers::decode_report))
        .route("/api/v1/report/store", post(handlers::store_report))
        .route("/api/v1/report/:id", get(handlers::retrieve_report))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("💰 Costwise API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/calculate, /api/v1/break-even, /api/v1/investor, /api/v1/report/*");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Costwise API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
