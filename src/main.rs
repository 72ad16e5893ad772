//! Epiboard Server
//!
//! Run with: cargo run --bin epiboard -- --data data/country_wise_latest.csv
//!
//! Configuration is read from `--config`, or from the default locations
//! (see [`epiboard::config::Config::load_default`]), then overridden by
//! `EPIBOARD_*` environment variables and finally by command-line flags.

use clap::Parser;
use epiboard::api::{serve, AppState};
use epiboard::config::Config;
use epiboard::data::TableLoader;
use epiboard::views::DashboardContext;
use epiboard::websocket::HubConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "epiboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pandemic statistics dashboard server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file with one row per country
    #[arg(short, long)]
    data: Option<String>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = epiboard::logging::with_bootstrap(|| match &args.config {
        Some(path) => Config::load_with_env(path),
        None => Config::load_default(),
    })?;
    if let Some(data) = args.data {
        config.data.path = data;
    }
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    epiboard::logging::init(&config.logging);

    tracing::info!("Starting Epiboard server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data file: {}", config.data.path);

    let table = TableLoader::from_config(&config.data).load(Path::new(&config.data.path))?;

    let defaults = config.dashboard.default_selection();
    for country in &defaults.countries {
        if table.get(country).is_none() {
            tracing::warn!(country = %country, "Default country not present in table");
        }
    }
    tracing::info!(
        countries = ?defaults.countries,
        metric = %defaults.metric,
        "Default selection"
    );

    let dashboard = DashboardContext::new(table, defaults);
    let hub_config = HubConfig {
        max_connections: config.websocket.max_connections,
    };
    let state = AppState::with_ws_config(dashboard, config.api.clone(), hub_config);

    serve(state, &config.api).await?;

    tracing::info!("Epiboard server stopped");
    Ok(())
}
