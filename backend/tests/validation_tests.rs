//! Request validation tests
//!
//! Exercises the shared validators that gate every inbound request:
//! - date window acceptance across [today, today + delta_days]
//! - min/max temperature consistency for manual submissions
//! - city presence

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use shared::validation::{
    validate_city, validate_forecast_query, validate_manual_forecast, DATE_INPUT_FORMAT,
};

const DELTA_DAYS: i64 = 10;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()
}

fn wire_date(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMAT).to_string()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_window_boundaries() {
    // Inclusive on both ends
    for offset in [0, 1, DELTA_DAYS] {
        let date = wire_date(today() + Duration::days(offset));
        assert!(
            validate_forecast_query(Some("Moscow"), Some(&date), today(), DELTA_DAYS).is_ok(),
            "offset {offset} should be accepted"
        );
    }

    // One day outside either end
    let yesterday = wire_date(today() - Duration::days(1));
    let errors = validate_forecast_query(Some("Moscow"), Some(&yesterday), today(), DELTA_DAYS)
        .unwrap_err();
    assert!(errors.contains("date"));

    let beyond = wire_date(today() + Duration::days(DELTA_DAYS + 1));
    let errors =
        validate_forecast_query(Some("Moscow"), Some(&beyond), today(), DELTA_DAYS).unwrap_err();
    assert!(errors.contains("date"));
}

#[test]
fn test_city_required_on_every_entry_point() {
    assert!(validate_city(None).is_err());
    assert!(validate_forecast_query(None, Some("10.06.2025"), today(), DELTA_DAYS).is_err());
    assert!(validate_manual_forecast(
        Some(""),
        Some("10.06.2025"),
        Some(10.0),
        Some(20.0),
        today(),
        DELTA_DAYS,
    )
    .is_err());
}

#[test]
fn test_wire_format_is_day_month_year() {
    let request =
        validate_forecast_query(Some("Moscow"), Some("10.06.2025"), today(), DELTA_DAYS).unwrap();
    assert_eq!(request.date, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

/// Strategy for offsets inside the allowed window
fn valid_offset_strategy() -> impl Strategy<Value = i64> {
    0..=DELTA_DAYS
}

/// Strategy for plausible temperatures, one decimal place
fn temperature_strategy() -> impl Strategy<Value = f64> {
    (-600i64..=600i64).prop_map(|n| n as f64 / 10.0)
}

/// Strategy for non-empty city names
fn city_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,30}[A-Za-z]"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every date inside [today, today + delta] validates
    #[test]
    fn prop_dates_in_window_accepted(offset in valid_offset_strategy(), city in city_strategy()) {
        let date = wire_date(today() + Duration::days(offset));
        let request =
            validate_forecast_query(Some(&city), Some(&date), today(), DELTA_DAYS).unwrap();
        prop_assert_eq!(request.date, today() + Duration::days(offset));
    }

    /// Dates outside the window never validate
    #[test]
    fn prop_dates_outside_window_rejected(offset in 1i64..=365) {
        let past = wire_date(today() - Duration::days(offset));
        prop_assert!(
            validate_forecast_query(Some("Moscow"), Some(&past), today(), DELTA_DAYS).is_err()
        );

        let future = wire_date(today() + Duration::days(DELTA_DAYS + offset));
        prop_assert!(
            validate_forecast_query(Some("Moscow"), Some(&future), today(), DELTA_DAYS).is_err()
        );
    }

    /// min > max always fails regardless of the other fields
    #[test]
    fn prop_inverted_temperatures_rejected(
        offset in valid_offset_strategy(),
        city in city_strategy(),
        max in temperature_strategy(),
        gap in 1i64..=200,
    ) {
        let min = max + gap as f64 / 10.0;
        let date = wire_date(today() + Duration::days(offset));

        let errors = validate_manual_forecast(
            Some(&city),
            Some(&date),
            Some(min),
            Some(max),
            today(),
            DELTA_DAYS,
        )
        .unwrap_err();

        prop_assert!(errors.contains("min_temperature"));
        prop_assert!(errors.contains("max_temperature"));
    }

    /// Well-formed submissions validate and keep their values
    #[test]
    fn prop_ordered_temperatures_accepted(
        offset in valid_offset_strategy(),
        city in city_strategy(),
        min in temperature_strategy(),
        spread in 0i64..=200,
    ) {
        let max = min + spread as f64 / 10.0;
        let date = wire_date(today() + Duration::days(offset));

        let input = validate_manual_forecast(
            Some(&city),
            Some(&date),
            Some(min),
            Some(max),
            today(),
            DELTA_DAYS,
        )
        .unwrap();

        prop_assert_eq!(input.city, city.trim().to_string());
        prop_assert_eq!(input.min_temperature, min);
        prop_assert_eq!(input.max_temperature, max);
    }
}
