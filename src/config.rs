//! Configuration management for `Wayfinder`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AssistantError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Key value shipped in sample `.env` files, treated as "not configured"
const PLACEHOLDER_API_KEY: &str = "your_google_maps_api_key_here";

/// Root configuration structure for `Wayfinder`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WayfinderConfig {
    /// Maps provider configuration
    #[serde(default)]
    pub maps: MapsConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Per-route request limits
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Maps provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Google Maps API key
    pub api_key: Option<String>,
    /// Base URL for the maps web services
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
    /// Region bias for text search (ccTLD code)
    #[serde(default = "default_maps_region")]
    pub region: String,
    /// Result language
    #[serde(default = "default_maps_language")]
    pub language: String,
    /// Request timeout in seconds
    #[serde(default = "default_maps_timeout")]
    pub timeout_seconds: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Requests per minute allowed per client on each route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_search_per_minute")]
    pub search_per_minute: u32,
    #[serde(default = "default_directions_per_minute")]
    pub directions_per_minute: u32,
    #[serde(default = "default_chat_per_minute")]
    pub chat_per_minute: u32,
}

// Default value functions
fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_maps_region() -> String {
    "US".to_string()
}

fn default_maps_language() -> String {
    "en".to_string()
}

fn default_maps_timeout() -> u32 {
    10
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_search_per_minute() -> u32 {
    30
}

fn default_directions_per_minute() -> u32 {
    20
}

fn default_chat_per_minute() -> u32 {
    60
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_maps_base_url(),
            region: default_maps_region(),
            language: default_maps_language(),
            timeout_seconds: default_maps_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
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

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            search_per_minute: default_search_per_minute(),
            directions_per_minute: default_directions_per_minute(),
            chat_per_minute: default_chat_per_minute(),
        }
    }
}

impl MapsConfig {
    /// The API key, unless it is missing, blank or the sample placeholder
    #[must_use]
    pub fn credentials(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

impl WayfinderConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WAYFINDER_MAPS__API_KEY style overrides
        builder = builder.add_source(
            Environment::with_prefix("WAYFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WayfinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wayfinder").join("config.toml"))
    }

    /// Fill unset values from the plain variables older deployments export
    fn apply_legacy_env(&mut self) {
        if self.maps.api_key.is_none() {
            self.maps.api_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
        }
        if let Ok(region) = std::env::var("MAPS_REGION") {
            self.maps.region = region;
        }
        if let Ok(language) = std::env::var("MAPS_LANGUAGE") {
            self.maps.language = language;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.maps.base_url.is_empty() {
            self.maps.base_url = default_maps_base_url();
        }
        if self.maps.region.is_empty() {
            self.maps.region = default_maps_region();
        }
        if self.maps.language.is_empty() {
            self.maps.language = default_maps_language();
        }
        if self.maps.timeout_seconds == 0 {
            self.maps.timeout_seconds = default_maps_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
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
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.maps.timeout_seconds > 120 {
            return Err(AssistantError::configuration(
                "Maps API timeout cannot exceed 120 seconds",
            )
            .into());
        }

        let limits = [
            ("search", self.limits.search_per_minute),
            ("directions", self.limits.directions_per_minute),
            ("chat", self.limits.chat_per_minute),
        ];
        for (route, per_minute) in limits {
            if per_minute == 0 || per_minute > 10_000 {
                return Err(AssistantError::configuration(format!(
                    "Rate limit for {route} must be between 1 and 10000 requests per minute"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AssistantError::configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AssistantError::configuration(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.maps.base_url.starts_with("http://") && !self.maps.base_url.starts_with("https://")
        {
            return Err(AssistantError::configuration(
                "Maps API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
