//! Model Bundle
//!
//! The serialized `{model, threshold, features}` triple. Loaded once at
//! startup and shared read-only for the life of the process. Every shape
//! mismatch between the classifier and the feature list is caught here so
//! it can never surface as a per-request error.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::Deserialize;

use super::classifier::{Classifier, InferenceError, ModelSpec};
use super::threshold::{Decision, Threshold};
use crate::models::{Feature, InputError, LoanInput, FEATURE_COUNT};

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to read model bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model bundle: {0}")]
    Format(#[from] serde_json::Error),

    #[error("threshold {0} is outside [0, 1]")]
    Threshold(f64),

    #[error("expected {expected} features, bundle lists {found}")]
    FeatureCount { expected: usize, found: usize },

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("feature '{0}' is listed more than once")]
    DuplicateFeature(String),

    #[error("classifier expects {expected} features, bundle lists {found}")]
    ClassifierShape { expected: usize, found: usize },

    #[error("classifier feature order {classifier:?} does not match bundle features {bundle:?}")]
    FeatureOrder {
        classifier: Vec<String>,
        bundle: Vec<String>,
    },

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("{0} models are not supported in this build")]
    Unsupported(&'static str),
}

/// Why a prediction produced no decision
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Invalid(#[from] InputError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// On-disk layout. Exactly these three keys.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleFile {
    model: ModelSpec,
    threshold: f64,
    features: Vec<String>,
}

/// Scored result for one borrower
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub decision: Decision,
    pub threshold: f64,
    pub inference_time_us: u64,
}

pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    threshold: Threshold,
    features: Vec<Feature>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("classifier", &self.classifier.kind())
            .field("threshold", &self.threshold.value())
            .field("features", &self.feature_names())
            .field("source", &self.source)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

impl ModelBundle {
    /// Load and validate a bundle file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading model bundle");

        let raw = std::fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut bundle = Self::from_json_str(&raw, base_dir)?;
        bundle.source = path.display().to_string();

        tracing::info!(
            classifier = bundle.classifier.kind(),
            threshold = bundle.threshold.value(),
            loaded_at = %bundle.loaded_at,
            "Model bundle loaded"
        );

        Ok(bundle)
    }

    /// Parse a bundle from JSON; relative model paths resolve against `base_dir`
    pub fn from_json_str(raw: &str, base_dir: &Path) -> Result<Self, BundleError> {
        let file: BundleFile = serde_json::from_str(raw)?;
        let classifier = file.model.build(base_dir)?;
        Self::new(classifier, file.threshold, file.features)
    }

    /// Assemble a bundle from an already-built classifier
    pub fn new(
        classifier: Box<dyn Classifier>,
        threshold: f64,
        features: Vec<String>,
    ) -> Result<Self, BundleError> {
        let threshold = Threshold::new(threshold).ok_or(BundleError::Threshold(threshold))?;
        let resolved = resolve_features(&features)?;

        if classifier.n_features() != resolved.len() {
            return Err(BundleError::ClassifierShape {
                expected: classifier.n_features(),
                found: resolved.len(),
            });
        }

        if let Some(names) = classifier.feature_names() {
            if names != features.as_slice() {
                return Err(BundleError::FeatureOrder {
                    classifier: names.to_vec(),
                    bundle: features,
                });
            }
        }

        Ok(Self {
            classifier,
            threshold,
            features: resolved,
            source: "<memory>".to_string(),
            loaded_at: Utc::now(),
        })
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Single-row matrix in bundle feature order
    pub fn feature_row(&self, input: &LoanInput) -> Array2<f32> {
        Array2::from_shape_fn((1, self.features.len()), |(_, j)| {
            input.value(self.features[j]) as f32
        })
    }

    /// Validate, score and threshold one borrower
    pub fn predict(&self, input: &LoanInput) -> Result<Prediction, PredictError> {
        input.check()?;

        let start_time = Instant::now();
        let row = self.feature_row(input);
        let probs = self.classifier.predict_proba(row.view())?;

        if probs.len() != 1 {
            return Err(InferenceError(format!(
                "classifier returned {} probabilities for 1 row",
                probs.len()
            ))
            .into());
        }

        let probability = probs[0];
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError(format!("classifier returned probability {}", probability)).into());
        }

        Ok(Prediction {
            probability,
            decision: self.threshold.decide(probability),
            threshold: self.threshold.value(),
            inference_time_us: start_time.elapsed().as_micros() as u64,
        })
    }
}

fn resolve_features(names: &[String]) -> Result<Vec<Feature>, BundleError> {
    if names.len() != FEATURE_COUNT {
        return Err(BundleError::FeatureCount {
            expected: FEATURE_COUNT,
            found: names.len(),
        });
    }

    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            let feature = Feature::from_name(name)
                .ok_or_else(|| BundleError::UnknownFeature(name.clone()))?;
            if !seen.insert(feature) {
                return Err(BundleError::DuplicateFeature(name.clone()));
            }
            Ok(feature)
        })
        .collect()
}
