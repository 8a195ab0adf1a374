//! Request validation for the City Weather API
//!
//! Validators accumulate field-keyed messages so a response can report every
//! problem at once, the way the HTTP layer surfaces 400s. The current date
//! and the delta-days bound are parameters: callers inject the clock and the
//! configured limit at request time.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Textual date format accepted on the wire (e.g. "10.06.2025").
pub const DATE_INPUT_FORMAT: &str = "%d.%m.%Y";

/// Field-keyed validation messages, serialized as `{"field": ["msg", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }
}

/// A forecast query whose fields passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForecastRequest {
    pub city: String,
    pub date: NaiveDate,
}

/// A manual-forecast submission whose fields passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedManualForecast {
    pub city: String,
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

/// Validate the city parameter alone (current-weather requests).
pub fn validate_city(city: Option<&str>) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::default();
    match check_city(city, &mut errors) {
        Some(city) => Ok(city),
        None => Err(errors),
    }
}

/// Validate a forecast query: city plus a date within the allowed window.
pub fn validate_forecast_query(
    city: Option<&str>,
    date: Option<&str>,
    today: NaiveDate,
    delta_days: i64,
) -> Result<ValidatedForecastRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    let city = check_city(city, &mut errors);
    let date = check_date(date, today, delta_days, &mut errors);

    match (city, date) {
        (Some(city), Some(date)) => Ok(ValidatedForecastRequest { city, date }),
        _ => Err(errors),
    }
}

/// Validate a manual-forecast submission: forecast-query rules plus the
/// min/max temperature pair.
pub fn validate_manual_forecast(
    city: Option<&str>,
    date: Option<&str>,
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    today: NaiveDate,
    delta_days: i64,
) -> Result<ValidatedManualForecast, FieldErrors> {
    let mut errors = FieldErrors::default();
    let city = check_city(city, &mut errors);
    let date = check_date(date, today, delta_days, &mut errors);
    let temperatures = check_temperatures(min_temperature, max_temperature, &mut errors);

    match (city, date, temperatures) {
        (Some(city), Some(date), Some((min_temperature, max_temperature))) => {
            Ok(ValidatedManualForecast {
                city,
                date,
                min_temperature,
                max_temperature,
            })
        }
        _ => Err(errors),
    }
}

fn check_city(city: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match city.map(str::trim) {
        Some(city) if !city.is_empty() => Some(city.to_string()),
        _ => {
            errors.push("city", "city is required");
            None
        }
    }
}

fn check_date(
    raw: Option<&str>,
    today: NaiveDate,
    delta_days: i64,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        errors.push("date", "date is required");
        return None;
    };

    let date = match NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            errors.push("date", "invalid date format, expected dd.mm.yyyy");
            return None;
        }
    };

    if date < today {
        errors.push("date", "date cannot be in the past");
        return None;
    }
    if date > today + Duration::days(delta_days) {
        errors.push(
            "date",
            format!("date cannot be more than {delta_days} days in the future"),
        );
        return None;
    }

    Some(date)
}

fn check_temperatures(
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    errors: &mut FieldErrors,
) -> Option<(f64, f64)> {
    let min = match min_temperature {
        Some(min) => Some(min),
        None => {
            errors.push("min_temperature", "min_temperature is required");
            None
        }
    };
    let max = match max_temperature {
        Some(max) => Some(max),
        None => {
            errors.push("max_temperature", "max_temperature is required");
            None
        }
    };

    let (min, max) = (min?, max?);
    if min > max {
        errors.push(
            "min_temperature",
            "min_temperature cannot be greater than max_temperature",
        );
        errors.push(
            "max_temperature",
            "max_temperature cannot be less than min_temperature",
        );
        return None;
    }

    Some((min, max))
}
