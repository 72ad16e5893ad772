//! Configuration System
//!
//! Server settings come from a TOML file (every section optional), then
//! `EPIBOARD_*` environment variables, then command-line flags in `main`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data::Metric;
use crate::views::Selection;

/// Top-level `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub websocket: WebSocketConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: String,

    #[serde(default = "default_country_column")]
    pub country_column: String,

    #[serde(default = "default_confirmed_column")]
    pub confirmed_column: String,

    #[serde(default = "default_deaths_column")]
    pub deaths_column: String,

    #[serde(default = "default_recovered_column")]
    pub recovered_column: String,
}

fn default_data_path() -> String {
    "data/country_wise_latest.csv".to_string()
}

fn default_country_column() -> String {
    "Country/Region".to_string()
}

fn default_confirmed_column() -> String {
    "Confirmed".to_string()
}

fn default_deaths_column() -> String {
    "Deaths".to_string()
}

fn default_recovered_column() -> String {
    "Recovered".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            country_column: default_country_column(),
            confirmed_column: default_confirmed_column(),
            deaths_column: default_deaths_column(),
            recovered_column: default_recovered_column(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Initial widget state of a fresh dashboard
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_countries")]
    pub default_countries: Vec<String>,

    #[serde(default = "default_metric")]
    pub default_metric: Metric,
}

fn default_countries() -> Vec<String> {
    vec!["US".to_string(), "India".to_string(), "Brazil".to_string()]
}

fn default_metric() -> Metric {
    Metric::Confirmed
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_countries: default_countries(),
            default_metric: default_metric(),
        }
    }
}

impl DashboardConfig {
    /// The selection a new dashboard session starts with
    pub fn default_selection(&self) -> Selection {
        Selection::new(self.default_countries.iter().cloned(), self.default_metric)
    }
}

/// WebSocket session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_max_connections() -> usize {
    1000
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Built-in defaults plus `EPIBOARD_*` overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// A TOML file plus `EPIBOARD_*` overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing file among the standard locations, else [`Config::from_env`]
    ///
    /// A file that exists but cannot be read or parsed is an error rather
    /// than a silent fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("epiboard").join("config.toml")),
            Some(PathBuf::from("/etc/epiboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Overlay `EPIBOARD_*` variables from the process environment
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("EPIBOARD_DATA_PATH") {
            self.data.path = path;
        }

        if let Some(host) = var("EPIBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("EPIBOARD_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid EPIBOARD_API_PORT"),
            }
        }

        if let Some(level) = var("EPIBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("EPIBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Commented `config.toml` with every default spelled out
pub fn generate_default_config() -> String {
    r#"# Epiboard Configuration
#
# Environment variables override these settings:
# - EPIBOARD_DATA_PATH
# - EPIBOARD_API_HOST
# - EPIBOARD_API_PORT
# - EPIBOARD_LOG_LEVEL
# - EPIBOARD_LOG_FORMAT

[data]
# CSV file with one row per country
path = "data/country_wise_latest.csv"

# Header names of the columns the dashboard reads
country_column = "Country/Region"
confirmed_column = "Confirmed"
deaths_column = "Deaths"
recovered_column = "Recovered"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8050

# Allowed CORS origins (empty allows any origin)
cors_origins = []

[dashboard]
# Countries selected when a dashboard opens
default_countries = ["US", "India", "Brazil"]

# Metric selected when a dashboard opens: Confirmed, Deaths or Recovered
default_metric = "Confirmed"

[websocket]
# Maximum number of concurrent dashboard sessions
max_connections = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
