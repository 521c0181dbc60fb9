//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. The feature encoder lives here because it
//! is the only piece with clinical meaning of its own.

mod chat;
mod encoding;
mod locale;
mod patient;
mod prediction;

pub use chat::{ChatMessage, ChatTranscript, Role};
pub use encoding::FeatureEncoder;
pub use locale::{Locale, OptionLabels, UiText};
pub use patient::{FeatureVector, PatientRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use prediction::{Prediction, Verdict, POSITIVE_THRESHOLD};
