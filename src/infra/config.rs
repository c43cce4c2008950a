//! Configuration loading from TOML files
//!
//! Config file is selected via the --config command line argument,
//! default: config/dev.toml. A missing or malformed file degrades to
//! built-in defaults with a warning.

use crate::domain::types::Coordinates;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL clients use to reach this service (item image links)
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_public_url() -> String {
    "http://localhost:3333".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

/// Backend API as seen from the registration client
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_api_timeout_ms() -> u64 {
    2000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_api_base_url(), timeout_ms: default_api_timeout_ms() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IbgeConfig {
    #[serde(default = "default_ibge_base_url")]
    pub base_url: String,
    #[serde(default = "default_ibge_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_ibge_base_url() -> String {
    "https://servicodados.ibge.gov.br/api/v1/localidades".to_string()
}

fn default_ibge_timeout_ms() -> u64 {
    5000
}

impl Default for IbgeConfig {
    fn default() -> Self {
        Self { base_url: default_ibge_base_url(), timeout_ms: default_ibge_timeout_ms() }
    }
}

/// Fixed device position for headless runs; absent means unresolved
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval_secs")]
    pub interval_secs: u64,
}

fn default_metrics_interval_secs() -> u64 {
    10
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval_secs() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ibge: IbgeConfig,
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    bind_address: String,
    port: u16,
    public_url: String,
    api_base_url: String,
    api_timeout_ms: u64,
    ibge_base_url: String,
    ibge_timeout_ms: u64,
    device_position: Option<Coordinates>,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            public_url: default_public_url(),
            api_base_url: default_api_base_url(),
            api_timeout_ms: default_api_timeout_ms(),
            ibge_base_url: default_ibge_base_url(),
            ibge_timeout_ms: default_ibge_timeout_ms(),
            device_position: None,
            metrics_interval_secs: default_metrics_interval_secs(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let device_position = match (toml_config.geolocation.latitude, toml_config.geolocation.longitude)
        {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };

        Ok(Self {
            bind_address: toml_config.server.bind_address,
            port: toml_config.server.port,
            public_url: toml_config.server.public_url,
            api_base_url: toml_config.api.base_url,
            api_timeout_ms: toml_config.api.timeout_ms,
            ibge_base_url: toml_config.ibge.base_url,
            ibge_timeout_ms: toml_config.ibge.timeout_ms,
            device_position,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn api_timeout_ms(&self) -> u64 {
        self.api_timeout_ms
    }

    pub fn ibge_base_url(&self) -> &str {
        &self.ibge_base_url
    }

    pub fn ibge_timeout_ms(&self) -> u64 {
        self.ibge_timeout_ms
    }

    pub fn device_position(&self) -> Option<Coordinates> {
        self.device_position
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to set the device position
    #[cfg(test)]
    pub fn with_device_position(mut self, position: Coordinates) -> Self {
        self.device_position = Some(position);
        self
    }
}
