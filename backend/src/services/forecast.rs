//! Forecast resolution service
//!
//! Blends the persisted manual-forecast store with the upstream weather and
//! time providers. A stored manual entry always wins over the provider
//! forecast; the provider is only consulted when the store has no entry for
//! the requested (city, date).

use std::future::Future;

use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::external::{CityTimeClient, WeatherClient};
use crate::models::{ForecastDay, TemperatureRange};
use shared::validation::{ValidatedForecastRequest, ValidatedManualForecast};

/// Service for current-weather and forecast resolution
#[derive(Clone)]
pub struct ForecastService {
    db: PgPool,
    weather: WeatherClient,
    time: CityTimeClient,
}

/// Assembled current-weather answer
#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeatherReport {
    pub temperature: f64,
    pub local_time: String,
}

/// Where a forecast answer came from
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastAnswer {
    /// A manually entered forecast from the store, returned verbatim.
    Stored(TemperatureRange),
    /// The upstream provider's entry for the date, absent when the date is
    /// outside the provider's window.
    Upstream(Option<ForecastDay>),
}

/// Outcome of a manual-forecast upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(db: PgPool, weather: WeatherClient, time: CityTimeClient) -> Self {
        Self { db, weather, time }
    }

    /// Current temperature and local time for the city. Both upstream
    /// lookups must succeed; either failure fails the whole request.
    pub async fn current_weather(&self, city: &str) -> AppResult<CurrentWeatherReport> {
        let temperature = self.weather.get_current_weather(city).await?;
        let local_time = self.time.get_time(city).await?;

        Ok(CurrentWeatherReport {
            temperature,
            local_time,
        })
    }

    /// Forecast for a validated (city, date): the store first, the provider
    /// only on a store miss.
    pub async fn forecast_for_date(
        &self,
        request: &ValidatedForecastRequest,
    ) -> AppResult<ForecastAnswer> {
        let stored = self.find(&request.city, request.date).await?;
        resolve_forecast(stored, || {
            self.weather.get_forecast_by_date(&request.city, request.date)
        })
        .await
    }

    /// Exact-match lookup of a manually entered forecast.
    pub async fn find(
        &self,
        city: &str,
        date: chrono::NaiveDate,
    ) -> AppResult<Option<TemperatureRange>> {
        let row = sqlx::query_as::<_, (f64, f64)>(
            r#"
            SELECT min_temperature, max_temperature
            FROM manual_forecasts
            WHERE city = $1 AND date = $2
            "#,
        )
        .bind(city)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(min_temperature, max_temperature)| TemperatureRange {
            min_temperature,
            max_temperature,
        }))
    }

    /// Insert or update the manual forecast for (city, date) in one
    /// statement, reporting whether a row was created.
    pub async fn upsert(&self, input: &ValidatedManualForecast) -> AppResult<UpsertOutcome> {
        // xmax is zero only for rows freshly inserted by this statement.
        let created: bool = sqlx::query_scalar(
            r#"
            INSERT INTO manual_forecasts (city, date, min_temperature, max_temperature)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (city, date) DO UPDATE
            SET min_temperature = EXCLUDED.min_temperature,
                max_temperature = EXCLUDED.max_temperature,
                updated_at = now()
            RETURNING (xmax = 0)
            "#,
        )
        .bind(&input.city)
        .bind(input.date)
        .bind(input.min_temperature)
        .bind(input.max_temperature)
        .fetch_one(&self.db)
        .await?;

        Ok(if created {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }
}

/// Store-first resolution: a stored entry is answered verbatim and `fetch`
/// is never invoked; otherwise the answer is whatever `fetch` yields.
pub async fn resolve_forecast<F, Fut>(
    stored: Option<TemperatureRange>,
    fetch: F,
) -> AppResult<ForecastAnswer>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<Option<ForecastDay>>>,
{
    if let Some(range) = stored {
        return Ok(ForecastAnswer::Stored(range));
    }
    Ok(ForecastAnswer::Upstream(fetch().await?))
}
