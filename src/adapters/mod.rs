//! Adapters layer: Concrete implementations of ports.
//!
//! - `model`: JSON ensemble artifact and its cached loader
//! - `gemini`: Gemini `generateContent` client
//! - `sanitize`: secret filtering for logs

pub mod gemini;
pub mod model;
pub mod sanitize;

pub use model::ModelLoadError;
