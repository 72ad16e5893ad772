//! Application State
//!
//! Everything a handler needs: the dashboard context, API settings and the
//! WebSocket session hub. Handlers receive it as `State<Arc<AppState>>`.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::views::DashboardContext;
use crate::websocket::{ConnectionHub, HubConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared table and dashboard defaults
    pub dashboard: DashboardContext,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Process start, for `/health` uptime
    pub start_time: Instant,
    /// WebSocket session hub
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    /// Create a new AppState with the default hub configuration
    pub fn new(dashboard: DashboardContext, config: ApiConfig) -> Self {
        Self::with_ws_config(dashboard, config, HubConfig::default())
    }

    /// Create AppState with custom WebSocket hub configuration
    pub fn with_ws_config(
        dashboard: DashboardContext,
        config: ApiConfig,
        hub_config: HubConfig,
    ) -> Self {
        Self {
            dashboard,
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub: Arc::new(ConnectionHub::new(hub_config)),
        }
    }

    /// Seconds since the state was built
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Open dashboard sessions
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
