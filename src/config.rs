use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::DEFAULT_CITY_CENTER;
use crate::models::{CategoryWeights, Coordinates};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum gap between calls to the service
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
            cache_size: default_cache_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_geocoder_url() -> String { "https://nominatim.openstreetmap.org/search".to_string() }
fn default_user_agent() -> String { "AptRank/1.0".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_min_interval_ms() -> u64 { 1000 }
fn default_cache_size() -> u64 { 10_000 }
fn default_cache_ttl_secs() -> u64 { 86_400 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_center_lat")]
    pub city_center_lat: f64,
    #[serde(default = "default_center_lng")]
    pub city_center_lng: f64,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl ScoringSettings {
    pub fn city_center(&self) -> Coordinates {
        Coordinates::new(self.city_center_lat, self.city_center_lng)
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            city_center_lat: default_center_lat(),
            city_center_lng: default_center_lng(),
            weights: WeightsConfig::default(),
        }
    }
}

fn default_center_lat() -> f64 { DEFAULT_CITY_CENTER.latitude }
fn default_center_lng() -> f64 { DEFAULT_CITY_CENTER.longitude }

/// Weights used when a rank request does not bring its own
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_commute_weight")]
    pub commute: u32,
    #[serde(default = "default_price_value_weight")]
    pub price_value: u32,
    #[serde(default = "default_space_weight")]
    pub space: u32,
    #[serde(default = "default_location_weight")]
    pub location: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            commute: default_commute_weight(),
            price_value: default_price_value_weight(),
            space: default_space_weight(),
            location: default_location_weight(),
        }
    }
}

impl From<&WeightsConfig> for CategoryWeights {
    fn from(config: &WeightsConfig) -> Self {
        CategoryWeights {
            commute: config.commute,
            price_value: config.price_value,
            space: config.space,
            location: config.location,
        }
    }
}

fn default_commute_weight() -> u32 { 40 }
fn default_price_value_weight() -> u32 { 30 }
fn default_space_weight() -> u32 { 20 }
fn default_location_weight() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// JSON array of listings loaded at startup
    pub seed_path: Option<String>,
    #[serde(default = "default_inactive_after_days")]
    pub inactive_after_days: i64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed_path: None,
            inactive_after_days: default_inactive_after_days(),
        }
    }
}

fn default_inactive_after_days() -> i64 { 2 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with APTRANK__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., APTRANK__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APTRANK")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
