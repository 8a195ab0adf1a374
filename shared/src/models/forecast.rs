//! Forecast value types
//!
//! Temperatures are degrees Celsius throughout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the upstream provider's forecast window, normalized from the
/// provider's sub-daily slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

/// The min/max pair answered by the manual-forecast store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_temperature: f64,
    pub max_temperature: f64,
}
