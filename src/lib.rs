//! # Heartysis
//!
//! Heart-disease risk form with a cardiology chat assistant.
//!
//! This crate provides:
//! - Encoding of localized clinical answers into the classifier's feature vector
//! - Scoring with a pre-trained ensemble loaded once per process
//! - A chat relay to the Gemini `generateContent` API
//! - Terminal UI for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient record, feature encoder, prediction, transcript)
//! - `ports`: Trait definitions for external operations (classifier, chat client)
//! - `adapters`: Concrete implementations (JSON model artifact, Gemini, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{FeatureVector, Locale, PatientRecord, Prediction, Verdict};

/// Result type for Heartysis operations
pub type Result<T> = std::result::Result<T, HeartysisError>;

/// Main error type for Heartysis
#[derive(Debug, thiserror::Error)]
pub enum HeartysisError {
    #[error("Model could not be loaded: {0}")]
    Model(#[from] adapters::ModelLoadError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] application::PredictionError),

    #[error("Chat request failed: {0}")]
    Chat(#[from] ports::ChatError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
