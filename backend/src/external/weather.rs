//! Weather provider client
//!
//! Integrates with an OpenWeatherMap-shaped API for current conditions and
//! the multi-day forecast. Both operations are read-through cached under
//! distinct key prefixes; a failed fetch is never cached.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::cache::ResponseCache;
use crate::config::{Config, WeatherApiConfig};
use crate::error::{AppError, AppResult};
use crate::models::ForecastDay;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Weather provider client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    cache: ResponseCache,
    cache_ttl: Duration,
}

/// Provider response for current conditions; only the temperature is used.
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmCurrentMain,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentMain {
    temp: f64,
}

/// Provider response for the multi-day forecast
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastSlot>,
}

/// One sub-daily forecast slot ("2025-06-10 15:00:00" and its min/max)
#[derive(Debug, Deserialize)]
struct OwmForecastSlot {
    dt_txt: String,
    main: OwmSlotMain,
}

#[derive(Debug, Deserialize)]
struct OwmSlotMain {
    temp_min: f64,
    temp_max: f64,
}

/// Provider error body, e.g. `{"cod": "404", "message": "city not found"}`
#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    message: String,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &Config, cache: ResponseCache) -> Self {
        Self::from_parts(&config.weather, cache, config.forecast.cache_ttl())
    }

    pub fn from_parts(weather: &WeatherApiConfig, cache: ResponseCache, cache_ttl: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: weather.api_key.clone(),
            base_url: weather.base_url.clone(),
            cache,
            cache_ttl,
        }
    }

    /// Current temperature in Celsius for the city, cached per city.
    pub async fn get_current_weather(&self, city: &str) -> AppResult<f64> {
        self.cache
            .get_or_compute("current_weather", city, self.cache_ttl, || {
                self.fetch_current_weather(city)
            })
            .await
    }

    /// The provider's forecast window keyed by calendar date, cached per city.
    pub async fn get_forecast(&self, city: &str) -> AppResult<BTreeMap<NaiveDate, ForecastDay>> {
        self.cache
            .get_or_compute("forecast", city, self.cache_ttl, || {
                self.fetch_forecast(city)
            })
            .await
    }

    /// One day out of the forecast window; absent is not an error.
    pub async fn get_forecast_by_date(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ForecastDay>> {
        let forecast = self.get_forecast(city).await?;
        Ok(forecast.get(&date).cloned())
    }

    async fn fetch_current_weather(&self, city: &str) -> AppResult<f64> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await
            .map_err(AppError::UpstreamWeatherTransport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenWeather current weather error: {} - {}", status, body);
            return Err(AppError::UpstreamWeather(provider_message(&body, status)));
        }

        let data: OwmCurrentResponse = response.json().await.map_err(|e| {
            AppError::Internal(format!("failed to parse current weather response: {e}"))
        })?;

        Ok(data.main.temp)
    }

    async fn fetch_forecast(&self, city: &str) -> AppResult<BTreeMap<NaiveDate, ForecastDay>> {
        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await
            .map_err(AppError::UpstreamWeatherTransport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenWeather forecast error: {} - {}", status, body);
            return Err(AppError::UpstreamWeather(provider_message(&body, status)));
        }

        let data: OwmForecastResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("failed to parse forecast response: {e}")))?;

        Ok(group_by_date(data.list))
    }
}

/// Group sub-daily slots by the date portion of `dt_txt`, keeping the
/// provider-supplied min/max of each slot. A later slot for the same date
/// overwrites the earlier one.
fn group_by_date(slots: Vec<OwmForecastSlot>) -> BTreeMap<NaiveDate, ForecastDay> {
    let mut days = BTreeMap::new();
    for slot in slots {
        let Some(raw_date) = slot.dt_txt.split_whitespace().next() else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") else {
            continue;
        };
        days.insert(
            date,
            ForecastDay {
                date,
                min_temperature: slot.main.temp_min,
                max_temperature: slot.main.temp_max,
            },
        );
    }
    days
}

fn provider_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<OwmErrorBody>(body)
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("status {status}"))
}
