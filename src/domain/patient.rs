//! Patient record and the positional feature vector fed to the classifier.

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Number of columns the classifier was trained on.
pub const FEATURE_COUNT: usize = 11;

/// Column names in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Sex",
    "ChestPainType",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "RestingECG",
    "MaxHR",
    "ExerciseAngina",
    "Oldpeak",
    "ST_Slope",
];

/// Raw answers collected by the form for one analysis.
///
/// Categorical fields keep the localized option string exactly as the user
/// picked it; `FeatureEncoder` turns them into codes. Numeric fields are not
/// range-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years
    pub age: i64,
    pub sex: String,
    pub chest_pain_type: String,
    /// Resting blood pressure in mm Hg
    pub resting_bp: f64,
    /// Serum cholesterol in mg/dl
    pub cholesterol: f64,
    pub fasting_bs: String,
    pub resting_ecg: String,
    /// Maximum heart rate achieved
    pub max_hr: f64,
    pub exercise_angina: String,
    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,
    pub st_slope: String,
}

impl PatientRecord {
    /// A typical symptomatic patient, expressed in the given locale.
    ///
    /// Encodes to `[54, 1, 2, 130, 246, 0, 0, 150, 0, 1.0, 1]`.
    #[must_use]
    pub fn sample(locale: Locale) -> Self {
        let o = locale.options();
        Self {
            age: 54,
            sex: o.sex[0].to_string(),
            chest_pain_type: o.chest_pain[3].to_string(),
            resting_bp: 130.0,
            cholesterol: 246.0,
            fasting_bs: o.fasting_bs[1].to_string(),
            resting_ecg: o.resting_ecg[0].to_string(),
            max_hr: 150.0,
            exercise_angina: o.exercise_angina[1].to_string(),
            oldpeak: 1.0,
            st_slope: o.st_slope[0].to_string(),
        }
    }
}

/// Encoded single-row input, positional in `FEATURE_NAMES` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build from a slice.
    ///
    /// # Errors
    /// Returns error if the slice does not hold exactly 11 values.
    pub fn from_slice(v: &[f64]) -> Result<Self, String> {
        let values: [f64; FEATURE_COUNT] = v
            .try_into()
            .map_err(|_| format!("Expected {FEATURE_COUNT} features, got {}", v.len()))?;
        Ok(Self(values))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(FeatureVector::from_slice(&[1.0; 10]).is_err());
        assert!(FeatureVector::from_slice(&[1.0; 12]).is_err());

        let v = FeatureVector::from_slice(&[2.0; 11]).expect("Should parse");
        assert_eq!(v.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_sample_uses_locale_options() {
        let ru = PatientRecord::sample(Locale::Ru);
        assert_eq!(ru.sex, "М");
        assert_eq!(ru.st_slope, "Вверх");

        let en = PatientRecord::sample(Locale::En);
        assert_eq!(en.chest_pain_type, "asymptomatic");
        assert_eq!(en.fasting_bs, "<=120");
    }
}
