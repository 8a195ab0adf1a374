//! Error handling for the City Weather API
//!
//! Upstream "not found" and upstream "provider error" both surface as 404,
//! matching the behavior callers already depend on, but the variants stay
//! distinct so the statuses can be split later without reworking call sites.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use shared::validation::FieldErrors;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client input errors
    #[error("validation failed")]
    Validation(FieldErrors),

    // Weather provider errors
    #[error("OpenWeather API error - {0}")]
    UpstreamWeather(String),

    #[error("OpenWeather API error - connection failed: {0}")]
    UpstreamWeatherTransport(#[source] reqwest::Error),

    // Time provider errors
    #[error("WorldTime API error - {0}")]
    CityTime(String),

    #[error("WorldTime API error - connection failed: {0}")]
    CityTimeTransport(#[source] reqwest::Error),

    // Database errors
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("internal server error: {0}")]
    Internal(String),
}

/// Body shape for non-validation errors
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Error: {:?}", self);

        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            AppError::UpstreamWeather(_)
            | AppError::UpstreamWeatherTransport(_)
            | AppError::CityTime(_)
            | AppError::CityTimeTransport(_) => {
                let body = ErrorBody {
                    error: self.to_string(),
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            AppError::Database(_) | AppError::Internal(_) => {
                let body = ErrorBody {
                    error: self.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let mut errors = FieldErrors::default();
        errors.push("city", "city is required");
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_errors_map_to_404() {
        let response = AppError::UpstreamWeather("city not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::CityTime("city 'Nowhere' not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
