//! Route definitions for the City Weather API

use axum::{
    routing::get,
    Router,
};

use crate::{handlers, AppState};

/// Weather routes, mounted under /api/weather
pub fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(handlers::get_current_weather))
        .route(
            "/forecast",
            get(handlers::get_forecast).post(handlers::submit_forecast),
        )
}
