//! HTTP handlers for the City Weather API

pub mod health;
pub mod weather;

pub use health::health_check;
pub use weather::{get_current_weather, get_forecast, submit_forecast};
