//! Domain models for the City Weather API

pub mod forecast;

pub use forecast::*;
