//! Business logic services for the City Weather API

pub mod forecast;

pub use forecast::ForecastService;
