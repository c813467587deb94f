//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Proximity filtering
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Reference point resolution
    #[serde(default)]
    pub location: LocationConfig,

    /// Document store access
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Proximity filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProximityConfig {
    /// Search radius in kilometers (inclusive)
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Sort nearby results nearest-first instead of keeping fetch order
    #[serde(default)]
    pub sort_by_distance: bool,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            sort_by_distance: false,
        }
    }
}

fn default_radius_km() -> f64 {
    50.0
}

/// Location provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationConfig {
    /// Latitude used when no device fix is available
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,

    /// Longitude used when no device fix is available
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,

    /// Seconds to wait for a device fix before falling back
    #[serde(default = "default_location_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
            timeout_secs: default_location_timeout_secs(),
        }
    }
}

fn default_fallback_latitude() -> f64 {
    -37.81
}

fn default_fallback_longitude() -> f64 {
    144.96
}

fn default_location_timeout_secs() -> u64 {
    5
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryConfig {
    /// Firestore project id
    #[serde(default)]
    pub project_id: Option<String>,

    /// Web API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Firestore REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection holding the public legends
    #[serde(default = "default_legends_collection")]
    pub legends_collection: String,

    /// Collection holding premium hidden gems
    #[serde(default = "default_hidden_gems_collection")]
    pub hidden_gems_collection: String,

    /// Request timeout in seconds
    #[serde(default = "default_repository_timeout_secs")]
    pub timeout_secs: u64,

    /// Documents requested per page when listing a collection
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            base_url: default_base_url(),
            legends_collection: default_legends_collection(),
            hidden_gems_collection: default_hidden_gems_collection(),
            timeout_secs: default_repository_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_legends_collection() -> String {
    "legends".to_string()
}

fn default_hidden_gems_collection() -> String {
    "legendsWgem".to_string()
}

fn default_repository_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Include the event target (module path)
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            show_target: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
