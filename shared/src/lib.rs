//! Shared types for the City Weather API
//!
//! This crate contains the domain model and request validation rules shared
//! between the backend server and its integration tests.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
