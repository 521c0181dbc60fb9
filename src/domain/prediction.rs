//! Prediction result types.
//!
//! Represents the positive-class probability returned by the classifier.

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Probabilities strictly above this are reported as likely disease.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Binarized reading of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Heart disease likely present
    Likely,
    /// Heart disease unlikely
    Unlikely,
}

impl Verdict {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > POSITIVE_THRESHOLD {
            Self::Likely
        } else {
            Self::Unlikely
        }
    }

    /// Localized message shown under the probability.
    #[must_use]
    pub fn message(&self, locale: Locale) -> &'static str {
        let text = locale.text();
        match self {
            Self::Likely => text.likely_disease,
            Self::Unlikely => text.unlikely_disease,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Likely => write!(f, "LIKELY"),
            Self::Unlikely => write!(f, "UNLIKELY"),
        }
    }
}

/// Positive-class probability for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Probability of heart disease (0.0 to 1.0)
    pub probability: f64,

    /// When the classifier produced it
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_probability(self.probability)
    }

    /// Probability rounded to four decimals for display.
    #[must_use]
    pub fn rounded(&self) -> f64 {
        (self.probability * 10_000.0).round() / 10_000.0
    }
}
