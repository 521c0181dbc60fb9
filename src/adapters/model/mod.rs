//! Model adapter: JSON ensemble artifact implementing `Classifier`.
//!
//! The artifact is a soft-voting ensemble of standardized logistic members
//! exported by the training pipeline. Loading validates every parameter
//! vector against the declared feature list so a malformed export fails at
//! startup rather than at the first prediction.
//!
//! # Integrity
//!
//! When an expected SHA-256 digest is configured (`HEARTYSIS_MODEL_SHA256`),
//! the raw artifact bytes must hash to it or loading is refused.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ports::{Classifier, ClassifierError};

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/ensemble_model.json";

/// Upper bound on columns; keeps a corrupt export from allocating wildly.
const MAX_FEATURES: usize = 256;

/// Errors while reading or validating the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model parameters: {0}")]
    Invalid(String),

    #[error("Model digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}

/// One logistic member as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticMember {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl LogisticMember {
    fn decision(&self, features: &[f64]) -> f64 {
        features
            .iter()
            .zip(&self.scaler_mean)
            .zip(&self.scaler_scale)
            .zip(&self.coefficients)
            .map(|(((x, mean), scale), coef)| (x - mean) / scale * coef)
            .sum::<f64>()
            + self.intercept
    }
}

/// Serialized ensemble artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleArtifact {
    pub feature_names: Vec<String>,
    pub members: Vec<LogisticMember>,
}

/// Validated, immutable ensemble ready for scoring.
#[derive(Debug)]
pub struct EnsembleModel {
    artifact: EnsembleArtifact,
    total_weight: f64,
    sha256: String,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Hex-encoded SHA-256 of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl EnsembleModel {
    /// Parse and validate an artifact from raw bytes.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or parameters are inconsistent.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelLoadError> {
        let artifact: EnsembleArtifact = serde_json::from_slice(bytes)?;
        Self::validate(&artifact)?;

        let total_weight = artifact.members.iter().map(|m| m.weight).sum();
        Ok(Self {
            artifact,
            total_weight,
            sha256: sha256_hex(bytes),
        })
    }

    /// Read an artifact from disk, checking its digest when one is pinned.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, the digest does not match,
    /// or the content is invalid.
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self, ModelLoadError> {
        let bytes = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(expected) = expected_sha256 {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(ModelLoadError::DigestMismatch {
                    expected: expected.trim().to_ascii_lowercase(),
                    actual,
                });
            }
        }

        let model = Self::from_slice(&bytes)?;
        tracing::info!(
            "Loaded model from {:?} (members={}, n_features={})",
            path,
            model.artifact.members.len(),
            model.n_features()
        );
        Ok(model)
    }

    fn validate(artifact: &EnsembleArtifact) -> Result<(), ModelLoadError> {
        let n = artifact.feature_names.len();
        if n == 0 || n > MAX_FEATURES {
            return Err(ModelLoadError::Invalid(format!(
                "Invalid feature count in model: got {n}, max {MAX_FEATURES}"
            )));
        }
        if artifact.members.is_empty() {
            return Err(ModelLoadError::Invalid("ensemble has no members".into()));
        }

        for (i, m) in artifact.members.iter().enumerate() {
            let label = if m.name.is_empty() {
                format!("member {i}")
            } else {
                format!("member '{}'", m.name)
            };
            if m.coefficients.len() != n || m.scaler_mean.len() != n || m.scaler_scale.len() != n {
                return Err(ModelLoadError::Invalid(format!(
                    "{label}: parameter lengths do not match feature_names length {n}"
                )));
            }
            if !(m.weight.is_finite() && m.weight > 0.0) {
                return Err(ModelLoadError::Invalid(format!(
                    "{label}: weight must be positive and finite"
                )));
            }
            if m.scaler_scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ModelLoadError::Invalid(format!(
                    "{label}: scaler_scale entries must be non-zero and finite"
                )));
            }
            let params_finite = m.intercept.is_finite()
                && m.coefficients.iter().all(|c| c.is_finite())
                && m.scaler_mean.iter().all(|c| c.is_finite());
            if !params_finite {
                return Err(ModelLoadError::Invalid(format!(
                    "{label}: parameters must be finite"
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.artifact.members.len()
    }

    /// SHA-256 of the artifact bytes this model was parsed from.
    #[must_use]
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

impl Classifier for EnsembleModel {
    fn n_features(&self) -> usize {
        self.artifact.feature_names.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ClassifierError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ClassifierError::FeatureCount {
                got: features.len(),
                expected,
            });
        }

        let weighted: f64 = self
            .artifact
            .members
            .iter()
            .map(|m| m.weight * sigmoid(m.decision(features)))
            .sum();
        let p = weighted / self.total_weight;

        if !p.is_finite() {
            return Err(ClassifierError::Model(
                "ensemble produced a non-finite probability".into(),
            ));
        }
        Ok([1.0 - p, p])
    }
}

/// Loads the artifact on first use and hands out the same instance after.
///
/// There is no invalidation: once a model is cached the file is never read
/// again for the lifetime of the loader.
#[derive(Debug)]
pub struct ModelLoader {
    path: PathBuf,
    expected_sha256: Option<String>,
    cached: OnceLock<Arc<EnsembleModel>>,
}

impl ModelLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, expected_sha256: Option<String>) -> Self {
        Self {
            path: path.into(),
            expected_sha256,
            cached: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the cached model, loading it on the first call.
    ///
    /// # Errors
    /// Returns error only while nothing is cached and loading fails.
    pub fn get(&self) -> Result<Arc<EnsembleModel>, ModelLoadError> {
        if let Some(model) = self.cached.get() {
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(EnsembleModel::load(
            &self.path,
            self.expected_sha256.as_deref(),
        )?);
        Ok(Arc::clone(self.cached.get_or_init(|| model)))
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn single_feature_artifact(intercept: f64) -> EnsembleArtifact {
        EnsembleArtifact {
            feature_names: vec!["x".into()],
            members: vec![LogisticMember {
                name: "lr".into(),
                weight: 1.0,
                scaler_mean: vec![0.0],
                scaler_scale: vec![1.0],
                coefficients: vec![1.0],
                intercept,
            }],
        }
    }

    fn write_artifact(path: &Path, artifact: &EnsembleArtifact) -> Vec<u8> {
        let bytes = serde_json::to_vec(artifact).expect("serialize artifact");
        std::fs::write(path, &bytes).expect("write artifact");
        bytes
    }

    #[test]
    fn test_single_member_matches_sigmoid() {
        let bytes = serde_json::to_vec(&single_feature_artifact(0.0)).expect("serialize");
        let model = EnsembleModel::from_slice(&bytes).expect("valid model");

        let [neg, pos] = model.predict_proba(&[0.0]).expect("score");
        assert!((pos - 0.5).abs() < 1e-12);
        assert!((neg + pos - 1.0).abs() < 1e-12);

        let [_, pos] = model.predict_proba(&[2.0]).expect("score");
        assert!((pos - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_soft_vote() {
        let mut artifact = single_feature_artifact(0.0);
        artifact.members.push(LogisticMember {
            name: "always-high".into(),
            weight: 3.0,
            scaler_mean: vec![0.0],
            scaler_scale: vec![1.0],
            coefficients: vec![0.0],
            intercept: 50.0,
        });
        let bytes = serde_json::to_vec(&artifact).expect("serialize");
        let model = EnsembleModel::from_slice(&bytes).expect("valid model");

        // (1 * 0.5 + 3 * ~1.0) / 4
        let [_, pos] = model.predict_proba(&[0.0]).expect("score");
        assert!((pos - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_feature_count_is_an_error() {
        let bytes = serde_json::to_vec(&single_feature_artifact(0.0)).expect("serialize");
        let model = EnsembleModel::from_slice(&bytes).expect("valid model");

        let err = model.predict_proba(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ClassifierError::FeatureCount { got: 2, expected: 1 });
    }

    #[test]
    fn test_rejects_inconsistent_parameters() {
        let mut artifact = single_feature_artifact(0.0);
        artifact.members[0].coefficients.push(1.0);
        let bytes = serde_json::to_vec(&artifact).expect("serialize");
        assert!(matches!(
            EnsembleModel::from_slice(&bytes),
            Err(ModelLoadError::Invalid(_))
        ));

        let mut artifact = single_feature_artifact(0.0);
        artifact.members[0].scaler_scale = vec![0.0];
        let bytes = serde_json::to_vec(&artifact).expect("serialize");
        assert!(matches!(
            EnsembleModel::from_slice(&bytes),
            Err(ModelLoadError::Invalid(_))
        ));

        let mut artifact = single_feature_artifact(0.0);
        artifact.members.clear();
        let bytes = serde_json::to_vec(&artifact).expect("serialize");
        assert!(EnsembleModel::from_slice(&bytes).is_err());

        assert!(matches!(
            EnsembleModel::from_slice(b"not json"),
            Err(ModelLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_digest_pin() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        let bytes = write_artifact(&path, &single_feature_artifact(0.3));
        let digest = sha256_hex(&bytes);

        let model = EnsembleModel::load(&path, Some(&digest.to_uppercase())).expect("pinned load");
        assert_eq!(model.sha256(), digest);

        let err = EnsembleModel::load(&path, Some(&"0".repeat(64))).unwrap_err();
        assert!(matches!(err, ModelLoadError::DigestMismatch { .. }));
    }

    #[test]
    fn test_loader_reads_artifact_once() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        write_artifact(&path, &single_feature_artifact(0.0));

        let loader = ModelLoader::new(&path, None);
        assert!(!loader.is_loaded());
        let first = loader.get().expect("first load");
        assert!(loader.is_loaded());

        // The file is gone; the cached instance is still served.
        std::fs::remove_file(&path).expect("remove artifact");
        let second = loader.get().expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_loader_missing_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let loader = ModelLoader::new(temp.path().join("missing.json"), None);
        assert!(matches!(loader.get(), Err(ModelLoadError::Io { .. })));
        assert!(!loader.is_loaded());
    }

    #[test]
    fn test_shipped_artifact_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MODEL_PATH);
        let model = EnsembleModel::load(&path, None).expect("shipped model loads");
        assert_eq!(model.n_features(), crate::domain::FEATURE_COUNT);
        assert_eq!(model.feature_names(), crate::domain::FEATURE_NAMES);

        let [_, p] = model
            .predict_proba(&[54.0, 1.0, 2.0, 130.0, 246.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0])
            .expect("score sample");
        assert!((0.0..=1.0).contains(&p));
    }
}
