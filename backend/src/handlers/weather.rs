//! HTTP handlers for the weather endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::forecast::{
    CurrentWeatherReport, ForecastAnswer, ForecastService, UpsertOutcome,
};
use crate::AppState;
use shared::validation;

/// Query parameters for the current-weather endpoint
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherQuery {
    pub city: Option<String>,
}

/// Query parameters for the forecast endpoint
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub city: Option<String>,
    pub date: Option<String>,
}

/// Body of a manual-forecast submission
#[derive(Debug, Deserialize)]
pub struct ManualForecastPayload {
    pub city: Option<String>,
    pub date: Option<String>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
}

/// Current temperature and local time for a city
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(query): Query<CurrentWeatherQuery>,
) -> AppResult<Json<CurrentWeatherReport>> {
    let city = validation::validate_city(query.city.as_deref()).map_err(AppError::Validation)?;

    let service = ForecastService::new(state.db, state.weather, state.time);
    let report = service.current_weather(&city).await?;
    Ok(Json(report))
}

/// Forecast for a city on a specific date, preferring the manual store
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Response> {
    let request = validation::validate_forecast_query(
        query.city.as_deref(),
        query.date.as_deref(),
        Utc::now().date_naive(),
        state.config.forecast.delta_days,
    )
    .map_err(AppError::Validation)?;

    let service = ForecastService::new(state.db, state.weather, state.time);
    let answer = service.forecast_for_date(&request).await?;

    Ok(match answer {
        ForecastAnswer::Stored(range) => Json(range).into_response(),
        ForecastAnswer::Upstream(day) => Json(day).into_response(),
    })
}

/// Create or update a manual forecast for (city, date)
pub async fn submit_forecast(
    State(state): State<AppState>,
    Json(payload): Json<ManualForecastPayload>,
) -> AppResult<StatusCode> {
    let input = validation::validate_manual_forecast(
        payload.city.as_deref(),
        payload.date.as_deref(),
        payload.min_temperature,
        payload.max_temperature,
        Utc::now().date_naive(),
        state.config.forecast.delta_days,
    )
    .map_err(AppError::Validation)?;

    let service = ForecastService::new(state.db, state.weather, state.time);
    let outcome = service.upsert(&input).await?;

    Ok(match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    })
}
