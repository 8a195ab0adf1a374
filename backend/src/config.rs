//! Configuration management for the City Weather API
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WAPI_ prefix
//!
//! The resulting struct is built once at startup and injected into every
//! component that needs it; nothing reads the environment at request time.

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather provider configuration
    pub weather: WeatherApiConfig,

    /// Time-by-coordinates provider configuration
    pub worldtime: WorldTimeConfig,

    /// Geocoding provider configuration
    pub geocoder: GeocoderConfig,

    /// Forecast resolution tunables
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherApiConfig {
    /// Provider base URL (current conditions + multi-day forecast endpoints)
    pub base_url: String,

    /// Provider API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorldTimeConfig {
    /// Time-by-coordinates endpoint URL
    pub api_url: String,

    /// API key sent in the X-Api-Key header
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    /// Free-text city search base URL (Nominatim-shaped)
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Upper bound, in days from today, for requestable forecast dates
    pub delta_days: i64,

    /// Time-to-live for cached upstream responses, in seconds
    pub cache_timeout_secs: u64,
}

impl ForecastConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WAPI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.base_url", "https://api.openweathermap.org/data/2.5")?
            .set_default("worldtime.api_url", "https://api.api-ninjas.com/v1/worldtime")?
            .set_default("geocoder.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("forecast.delta_days", 10)?
            .set_default("forecast.cache_timeout_secs", 600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WAPI_ prefix)
            .add_source(
                Environment::with_prefix("WAPI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
