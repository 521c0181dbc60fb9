//! Application layer: Use cases and services.
//!
//! Orchestrates domain logic with ports: scoring a patient record and
//! relaying chat prompts.

mod chat;
mod prediction;

pub use chat::ChatRelay;
pub use prediction::{PredictionError, PredictionService};
