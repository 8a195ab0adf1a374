//! Local-time lookup for a city
//!
//! Resolves the city to coordinates through a free-text geocoding search,
//! then asks a time-by-coordinates provider for the local datetime and
//! keeps the HH:MM portion. Results are not cached; the answer changes
//! every minute.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("weather-api/", env!("CARGO_PKG_VERSION"));

/// Client for resolving the current local time of a city
#[derive(Clone)]
pub struct CityTimeClient {
    client: Client,
    api_url: String,
    api_key: String,
    geocoder_url: String,
}

/// Geocoder search hit; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct GeocoderPlace {
    lat: String,
    lon: String,
}

/// Time provider response, e.g. `{"datetime": "2025-06-07 14:00:00"}`
#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    #[serde(default)]
    datetime: String,
}

#[derive(Debug, Deserialize)]
struct WorldTimeErrorBody {
    message: String,
}

impl CityTimeClient {
    /// Create a new CityTimeClient from configuration
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: config.worldtime.api_url.clone(),
            api_key: config.worldtime.api_key.clone(),
            geocoder_url: config.geocoder.base_url.clone(),
        }
    }

    /// Local time of the city as "HH:MM".
    pub async fn get_time(&self, city: &str) -> AppResult<String> {
        let (lat, lon) = self.geocode(city).await?;

        let response = self
            .client
            .get(&self.api_url)
            .header("X-Api-Key", &self.api_key)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(AppError::CityTimeTransport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("WorldTime API error: {} - {}", status, body);
            let message = serde_json::from_str::<WorldTimeErrorBody>(&body)
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(AppError::CityTime(message));
        }

        let data: WorldTimeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("failed to parse worldtime response: {e}")))?;

        clock_from_datetime(&data.datetime).ok_or_else(|| {
            AppError::Internal(format!(
                "unexpected datetime format from worldtime provider: '{}'",
                data.datetime
            ))
        })
    }

    async fn geocode(&self, city: &str) -> AppResult<(String, String)> {
        let url = format!("{}/search", self.geocoder_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(AppError::CityTimeTransport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Geocoder error: {} - {}", status, body);
            return Err(AppError::CityTime(format!("geocoder status {status}")));
        }

        let places: Vec<GeocoderPlace> = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("failed to parse geocoder response: {e}")))?;

        match places.into_iter().next() {
            Some(place) => Ok((place.lat, place.lon)),
            None => Err(AppError::CityTime(format!("city '{city}' not found"))),
        }
    }
}

/// Extract "HH:MM" from a "date time" string, dropping the seconds.
fn clock_from_datetime(raw: &str) -> Option<String> {
    let time = raw.split_whitespace().nth(1)?;
    let (hours_minutes, _seconds) = time.rsplit_once(':')?;
    Some(hours_minutes.to_string())
}
