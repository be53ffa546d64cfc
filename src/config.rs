//! Configuration management for the FireFight application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::FireFightError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the FireFight application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FireFightConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Risk backend the location page talks to
    pub backend: BackendConfig,
    /// Free-text geocoding provider
    pub geocoding: GeocodingConfig,
    /// Open-Meteo endpoints used by the risk backend
    pub weather: WeatherConfig,
    /// Live sensor endpoint
    pub sensor: SensorConfig,
    /// Fixed position reported as the device location, if any
    pub device: Option<DeviceConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Full URL of the coordinates endpoint; unset means this server's own `/api/coordinates`
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible search API
    pub base_url: String,
    /// User agent sent with every search request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL for historical (archive) data
    pub archive_base_url: String,
    /// Base URL for current conditions
    pub forecast_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// URL returning `{temperature, humidity}`
    pub url: String,
    /// Poll cadence in seconds
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_user_agent() -> String {
    format!("FireFight/{}", env!("CARGO_PKG_VERSION"))
}

fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_sensor_url() -> String {
    "http://localhost/data".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_geocoding_user_agent(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            archive_base_url: default_archive_base_url(),
            forecast_base_url: default_forecast_base_url(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            url: default_sensor_url(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SensorConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

impl FireFightConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // FIREFIGHT_SERVER__PORT=8080 style overrides
        builder = builder.add_source(
            Environment::with_prefix("FIREFIGHT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: FireFightConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("firefight").join("config.toml"))
    }

    /// Endpoint of the risk backend.
    ///
    /// Resolved on every call so a port changed after loading is picked up.
    #[must_use]
    pub fn backend_url(&self) -> String {
        if let Some(url) = &self.backend.url {
            return url.clone();
        }
        let host = match self.server.host.as_str() {
            "" | "0.0.0.0" | "::" | "[::]" => "localhost",
            host => host,
        };
        format!("http://{host}:{}/api/coordinates", self.server.port)
    }

    /// Apply default values to fields left blank
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.backend.url.as_deref().is_some_and(str::is_empty) {
            self.backend.url = None;
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_geocoding_user_agent();
        }
        if self.weather.archive_base_url.is_empty() {
            self.weather.archive_base_url = default_archive_base_url();
        }
        if self.weather.forecast_base_url.is_empty() {
            self.weather.forecast_base_url = default_forecast_base_url();
        }
        if self.sensor.url.is_empty() {
            self.sensor.url = default_sensor_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let backend_url = self.backend_url();
        let urls = [
            ("backend.url", &backend_url),
            ("geocoding.base_url", &self.geocoding.base_url),
            ("weather.archive_base_url", &self.weather.archive_base_url),
            ("weather.forecast_base_url", &self.weather.forecast_base_url),
            ("sensor.url", &self.sensor.url),
        ];

        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FireFightError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=3600).contains(&self.sensor.poll_interval_seconds) {
            return Err(FireFightError::config(
                "Sensor poll interval must be between 1 and 3600 seconds",
            )
            .into());
        }

        if let Some(device) = &self.device {
            if !(-90.0..=90.0).contains(&device.latitude)
                || !(-180.0..=180.0).contains(&device.longitude)
            {
                return Err(FireFightError::config(format!(
                    "Device position ({}, {}) is out of range",
                    device.latitude, device.longitude
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FireFightError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FireFightError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
