//! Dashboard configuration loader - parses flomon.toml
//!
//! Keeps the API location, default window, logging and endpoint settings
//! out of the code so they can be changed without recompiling. Every
//! section and key is optional; a missing file means all defaults.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use crate::logging::LogLevel;
use crate::model::{DEFAULT_BASE_URL, DEFAULT_WINDOW_HOURS, validate_window_hours};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "flomon.toml";

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub endpoint: EndpointConfig,
}

/// Flood-monitoring API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Trailing window for readings requests, in hours
    pub window_hours: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "debug", "info", "warn" or "error"
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn log_level(&self) -> Result<LogLevel, String> {
        self.level.parse()
    }
}

/// HTTP endpoint settings; the endpoint only runs when a port is set here
/// or passed on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub port: Option<u16>,
}

/// Parses configuration from TOML text and validates it.
pub fn parse_config(contents: &str) -> Result<DashboardConfig, String> {
    let config: DashboardConfig =
        toml::from_str(contents).map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.api.base_url.trim().is_empty() {
        return Err("api.base_url must not be empty".to_string());
    }
    validate_window_hours(config.api.window_hours).map_err(|e| format!("api.window_hours: {}", e))?;
    config.logging.log_level()?;

    Ok(config)
}

/// Loads configuration from `path`. A missing file yields the defaults;
/// an unreadable or invalid one is an error.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<DashboardConfig, String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("{}: {}", path.display(), e)),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(DashboardConfig::default()),
        Err(e) => Err(format!("Failed to read {}: {}", path.display(), e)),
    }
}

/// Loads `flomon.toml` from the working directory.
pub fn load_config() -> Result<DashboardConfig, String> {
    load_config_from(DEFAULT_CONFIG_PATH)
}
