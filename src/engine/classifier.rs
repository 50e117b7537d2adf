//! Classifier abstraction
//!
//! The bundle's `model` entry is an opaque, pre-trained binary classifier.
//! Every backend exposes the positive-class probability for a batch of rows.

use std::path::Path;

use ndarray::{Array1, ArrayView2};
use serde::Deserialize;

use super::bundle::BundleError;
use super::linear::LogisticModel;
use super::onnx::OnnxSpec;
use super::trees::TreeEnsemble;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

/// Trait for binary classifiers (tree ensembles, ONNX, ...)
pub trait Classifier: Send + Sync {
    /// Backend name for logs
    fn kind(&self) -> &'static str;

    /// Number of input columns the classifier was trained on
    fn n_features(&self) -> usize;

    /// Column names baked into the model, if it carries any
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Probability of the positive (default) class, one per row
    fn predict_proba(&self, rows: ArrayView2<'_, f32>) -> Result<Array1<f64>, InferenceError>;
}

/// Serialized model description, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    TreeEnsemble(TreeEnsemble),
    Logistic(LogisticModel),
    Onnx(OnnxSpec),
}

impl ModelSpec {
    /// Validate and instantiate. `base_dir` resolves relative model paths.
    pub fn build(self, base_dir: &Path) -> Result<Box<dyn Classifier>, BundleError> {
        match self {
            Self::TreeEnsemble(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
            Self::Logistic(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
            Self::Onnx(spec) => spec.load(base_dir),
        }
    }
}

/// Reject inputs whose width does not match the model
pub(crate) fn check_width(rows: &ArrayView2<'_, f32>, expected: usize) -> Result<(), InferenceError> {
    if rows.ncols() != expected {
        return Err(InferenceError(format!(
            "expected {} features per row, got {}",
            expected,
            rows.ncols()
        )));
    }
    Ok(())
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub(crate) fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
