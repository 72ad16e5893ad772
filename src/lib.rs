//! # Epiboard
//!
//! A reactive pandemic statistics dashboard backend. Loads one per-country
//! table at startup and serves four linked views (bar chart, scatter plot,
//! choropleth map and a textual summary) that follow the client's country
//! and metric selection.
//!
//! ## Features
//!
//! - **Immutable table**: validated once at load time, shared read-only
//! - **Pure derivations**: every view is recomputed from the table and the selection
//! - **Reactive sessions**: WebSocket clients receive fresh views on every selection change
//! - **Render-ready output**: series carry titles, log-axis flags and map settings
//!
//! ## Modules
//!
//! - [`data`]: Records, metrics, the table and its CSV loader
//! - [`views`]: View derivation engine and dashboard context
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Reactive dashboard sessions
//!
//! ## Quick Start
//!
//! ```rust
//! use epiboard::data::{Metric, TableLoader};
//! use epiboard::views::{DashboardContext, Selection};
//!
//! let csv = "Country/Region,Confirmed,Deaths,Recovered
//! US,100,10,50
//! India,200,20,80
//! Brazil,50,5,10";
//!
//! let table = TableLoader::new().load_str(csv)?;
//! let ctx = DashboardContext::new(table, Selection::new(["US", "India"], Metric::Confirmed));
//!
//! let views = ctx.derive_all(ctx.defaults());
//! assert_eq!(views.bar.points.len(), 2);
//! assert_eq!(views.choropleth.points.len(), 3);
//! println!("{}", views.summary?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod config;
pub mod data;
pub mod logging;
pub mod views;
pub mod websocket;

// Re-export top-level types for convenience
pub use data::{DataError, DataResult, InvalidMetric, Metric, Record, Table, TableLoader};

pub use views::{
    BarSeries, ChoroplethSeries, DashboardContext, DashboardViews, ScatterSeries, Selection,
    SelectionRequest, Summary, ViewError, ViewResult,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage};

pub use config::{
    ApiConfig, Config, ConfigError, DashboardConfig, DataConfig, LoggingConfig, WebSocketConfig,
};
