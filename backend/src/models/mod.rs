//! Domain models for the City Weather API
//!
//! Re-exports the shared crate's model types.

pub use shared::models::*;
