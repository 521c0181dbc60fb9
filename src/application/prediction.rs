//! Prediction service: Scores encoded patient records.
//!
//! Failures are contained here: the caller always gets a `Result` and decides
//! how to surface the error. Nothing is retried.

use std::sync::Arc;

use crate::domain::{FeatureEncoder, PatientRecord, Prediction};
use crate::ports::{Classifier, ClassifierError};

/// Errors from a single scoring attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Classifier returned an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Service wrapping the loaded classifier.
pub struct PredictionService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a new prediction service over an already-loaded classifier.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Positive-class probability for one feature row.
    ///
    /// # Errors
    /// Returns error if the classifier rejects the row or produces a value
    /// outside `[0, 1]`.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, PredictionError> {
        let result = self
            .classifier
            .predict_proba(features)
            .map_err(PredictionError::from)
            .and_then(|[_, positive]| {
                if positive.is_finite() && (0.0..=1.0).contains(&positive) {
                    Ok(Prediction::new(positive))
                } else {
                    Err(PredictionError::InvalidProbability(positive))
                }
            });

        match &result {
            Ok(prediction) => tracing::info!(
                "Prediction complete: verdict={}",
                prediction.verdict()
            ),
            Err(e) => tracing::error!("An error occurred during prediction: {}", e),
        }

        result
    }

    /// Encode a record and score it.
    ///
    /// # Errors
    /// See [`PredictionService::predict`].
    pub fn assess(
        &self,
        encoder: &FeatureEncoder,
        record: &PatientRecord,
    ) -> Result<Prediction, PredictionError> {
        let features = encoder.encode(record);
        self.predict(features.as_slice())
    }
}
