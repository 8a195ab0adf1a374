//! External API integrations

pub mod weather;
pub mod worldtime;

pub use weather::WeatherClient;
pub use worldtime::CityTimeClient;
