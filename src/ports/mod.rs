//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model artifact, LLM API).

mod chat_client;
mod classifier;

pub use chat_client::{ChatClient, ChatError};
pub use classifier::{Classifier, ClassifierError};
