//! Epiboard REST API
//!
//! HTTP API layer for Epiboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Catalog
//! - `GET /api/v1/countries` - Country selector options
//! - `GET /api/v1/metrics` - Metric selector options
//! - `GET /api/v1/selection/default` - Initial selection
//!
//! ## Views
//! - `POST /api/v1/views` - All four views for a selection
//! - `POST /api/v1/views/bar` - Bar chart series
//! - `POST /api/v1/views/scatter` - Scatter plot series
//! - `POST /api/v1/views/summary` - Summary sentence and aggregates
//! - `GET /api/v1/views/choropleth` - Choropleth series
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws` - Reactive dashboard session
//!
//! # Example
//!
//! ```rust,ignore
//! use epiboard::api::{serve, AppState};
//! use epiboard::config::Config;
//! use epiboard::data::TableLoader;
//! use epiboard::views::DashboardContext;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let table = TableLoader::from_config(&config.data).load(Path::new(&config.data.path))?;
//!     let dashboard = DashboardContext::new(table, config.dashboard.default_selection());
//!
//!     let state = AppState::new(dashboard, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Catalog routes
        .route("/countries", get(routes::catalog::list_countries))
        .route("/metrics", get(routes::catalog::list_metrics))
        .route("/selection/default", get(routes::catalog::default_selection))
        // View routes
        .route("/views", post(routes::views::all_views))
        .route("/views/bar", post(routes::views::bar_view))
        .route("/views/scatter", post(routes::views::scatter_view))
        .route("/views/summary", post(routes::views::summary_view))
        .route("/views/choropleth", get(routes::views::choropleth_view))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS policy: any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Epiboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Epiboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
