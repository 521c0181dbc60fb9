//! Classifier port: Trait for probability scoring.
//!
//! This trait abstracts the serialized model artifact from the application
//! logic so the prediction service can be exercised with stubs.

/// Errors raised while scoring a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { got: usize, expected: usize },

    #[error("Model evaluation failed: {0}")]
    Model(String),
}

/// A pre-trained binary classifier.
///
/// Implementations are immutable after construction and may be shared
/// between threads.
pub trait Classifier: Send + Sync {
    /// Number of input columns the model was trained on.
    fn n_features(&self) -> usize;

    /// Estimate class probabilities for a single row.
    ///
    /// # Returns
    /// `[p_negative, p_positive]`.
    ///
    /// # Errors
    /// Returns `ClassifierError::FeatureCount` if the row has the wrong
    /// number of columns.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ClassifierError>;
}
