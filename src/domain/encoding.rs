//! Categorical-to-numeric feature encoding.
//!
//! Each mapping is total: an answer that matches none of the recognized
//! options falls through to a fixed default code instead of failing. The codes
//! must stay identical to the ones the classifier was trained with.

use super::locale::{Locale, OptionLabels};
use super::patient::{FeatureVector, PatientRecord};

/// Encodes localized form answers into the classifier's input vector.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder {
    locale: Locale,
    options: &'static OptionLabels,
}

impl FeatureEncoder {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            options: locale.options(),
        }
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// male → 1, anything else → 0
    #[must_use]
    pub fn sex(&self, answer: &str) -> u8 {
        u8::from(answer == self.options.sex[0])
    }

    /// atypical → 0, non-anginal → 1, asymptomatic → 2, anything else → 3 (typical)
    #[must_use]
    pub fn chest_pain_type(&self, answer: &str) -> u8 {
        let [_, atypical, non_anginal, asymptomatic] = self.options.chest_pain;
        if answer == atypical {
            0
        } else if answer == non_anginal {
            1
        } else if answer == asymptomatic {
            2
        } else {
            3
        }
    }

    /// "> 120 mg/dl" → 1, anything else → 0
    #[must_use]
    pub fn fasting_bs(&self, answer: &str) -> u8 {
        u8::from(answer == self.options.fasting_bs[0])
    }

    /// normal → 0, ST-T abnormality → 1, anything else → 2
    #[must_use]
    pub fn resting_ecg(&self, answer: &str) -> u8 {
        let [normal, st_t, _] = self.options.resting_ecg;
        if answer == normal {
            0
        } else if answer == st_t {
            1
        } else {
            2
        }
    }

    /// yes → 1, anything else → 0
    #[must_use]
    pub fn exercise_angina(&self, answer: &str) -> u8 {
        u8::from(answer == self.options.exercise_angina[0])
    }

    /// flat → 0, up → 1, anything else → 2 (down)
    #[must_use]
    pub fn st_slope(&self, answer: &str) -> u8 {
        let [up, flat, _] = self.options.st_slope;
        if answer == flat {
            0
        } else if answer == up {
            1
        } else {
            2
        }
    }

    /// Encode a full record. Numeric fields pass through unchanged.
    #[must_use]
    pub fn encode(&self, record: &PatientRecord) -> FeatureVector {
        FeatureVector::new([
            record.age as f64,
            f64::from(self.sex(&record.sex)),
            f64::from(self.chest_pain_type(&record.chest_pain_type)),
            record.resting_bp,
            record.cholesterol,
            f64::from(self.fasting_bs(&record.fasting_bs)),
            f64::from(self.resting_ecg(&record.resting_ecg)),
            record.max_hr,
            f64::from(self.exercise_angina(&record.exercise_angina)),
            record.oldpeak,
            f64::from(self.st_slope(&record.st_slope)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::FEATURE_COUNT;

    #[test]
    fn test_chest_pain_codes_cover_all_options() {
        for locale in [Locale::Ru, Locale::En] {
            let enc = FeatureEncoder::new(locale);
            let codes: Vec<u8> = locale
                .options()
                .chest_pain
                .iter()
                .map(|s| enc.chest_pain_type(s))
                .collect();
            assert_eq!(codes, vec![3, 0, 1, 2]);
        }
    }

    #[test]
    fn test_unrecognized_chest_pain_falls_back_to_typical() {
        let enc = FeatureEncoder::new(Locale::En);
        assert_eq!(enc.chest_pain_type("atypical"), 3);
        assert_eq!(enc.chest_pain_type(""), 3);
        assert_eq!(enc.chest_pain_type("Asymptomatic"), 3);
    }

    #[test]
    fn test_binary_fields_require_exact_match() {
        let enc = FeatureEncoder::new(Locale::En);

        assert_eq!(enc.sex("male"), 1);
        assert_eq!(enc.fasting_bs(">120"), 1);
        assert_eq!(enc.exercise_angina("yes"), 1);

        for other in ["", "Male", " male", "female", "м", "yes ", ">120 ", "<=120", "no", "1"] {
            assert_eq!(enc.sex(other), 0, "sex({other:?})");
            assert_eq!(enc.fasting_bs(other), 0, "fasting_bs({other:?})");
            assert_eq!(enc.exercise_angina(other), 0, "exercise_angina({other:?})");
        }
    }

    #[test]
    fn test_russian_binary_options() {
        let enc = FeatureEncoder::new(Locale::Ru);
        assert_eq!(enc.sex("М"), 1);
        assert_eq!(enc.sex("Ж"), 0);
        // Latin M is a different code point.
        assert_eq!(enc.sex("M"), 0);
        assert_eq!(enc.fasting_bs("> 120 мг/дл"), 1);
        assert_eq!(enc.fasting_bs("<= 120 мг/дл"), 0);
        assert_eq!(enc.exercise_angina("Да"), 1);
        assert_eq!(enc.exercise_angina("Нет"), 0);
    }

    #[test]
    fn test_three_way_fields_and_defaults() {
        let enc = FeatureEncoder::new(Locale::En);

        assert_eq!(enc.resting_ecg("normal"), 0);
        assert_eq!(enc.resting_ecg("ST-T abnormality"), 1);
        assert_eq!(enc.resting_ecg("LVH"), 2);
        assert_eq!(enc.resting_ecg("ST"), 2);

        assert_eq!(enc.st_slope("flat"), 0);
        assert_eq!(enc.st_slope("up"), 1);
        assert_eq!(enc.st_slope("down"), 2);
        assert_eq!(enc.st_slope("sideways"), 2);
    }

    #[test]
    fn test_encode_sample_record() {
        let enc = FeatureEncoder::new(Locale::En);
        let record = PatientRecord {
            age: 54,
            sex: "male".into(),
            chest_pain_type: "asymptomatic".into(),
            resting_bp: 130.0,
            cholesterol: 246.0,
            fasting_bs: "<=120".into(),
            resting_ecg: "normal".into(),
            max_hr: 150.0,
            exercise_angina: "no".into(),
            oldpeak: 1.0,
            st_slope: "up".into(),
        };

        let v = enc.encode(&record);
        assert_eq!(
            v.to_vec(),
            vec![54.0, 1.0, 2.0, 130.0, 246.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0]
        );
        assert_eq!(v, FeatureEncoder::new(Locale::Ru).encode(&PatientRecord::sample(Locale::Ru)));
    }

    #[test]
    fn test_encode_is_fixed_length_for_any_answers() {
        let enc = FeatureEncoder::new(Locale::Ru);
        let garbage = PatientRecord {
            age: -5,
            sex: String::new(),
            chest_pain_type: "???".into(),
            resting_bp: -1.0,
            cholesterol: 1e9,
            fasting_bs: String::new(),
            resting_ecg: String::new(),
            max_hr: 0.0,
            exercise_angina: String::new(),
            oldpeak: -3.5,
            st_slope: String::new(),
        };

        let v = enc.encode(&garbage);
        assert_eq!(v.len(), FEATURE_COUNT);
        // Numeric columns pass through untouched; categories take their defaults.
        assert_eq!(
            v.to_vec(),
            vec![-5.0, 0.0, 3.0, -1.0, 1e9, 0.0, 2.0, 0.0, 0.0, -3.5, 2.0]
        );
    }
}
