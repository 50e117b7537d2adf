//! ONNX Runtime classifier
//!
//! Exported gradient-boosting classifiers (onnxmltools / skl2onnx) emit a
//! `label` tensor and a `[N, 2]` probability tensor. The probability output
//! is chosen by name, falling back to the last output.
//! Only available with the `onnx` feature.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::bundle::BundleError;
use super::classifier::Classifier;

/// Bundle entry pointing at an `.onnx` file
#[derive(Debug, Clone, Deserialize)]
pub struct OnnxSpec {
    /// Relative paths resolve against the bundle's directory
    pub path: PathBuf,
    pub num_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl OnnxSpec {
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base_dir.join(&self.path)
        }
    }

    #[cfg(feature = "onnx")]
    pub fn load(self, base_dir: &Path) -> Result<Box<dyn Classifier>, BundleError> {
        let path = self.resolve(base_dir);
        let model = runtime::OnnxClassifier::load(&path, self.num_features, self.feature_names)?;
        Ok(Box::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    pub fn load(self, _base_dir: &Path) -> Result<Box<dyn Classifier>, BundleError> {
        Err(BundleError::Unsupported("onnx"))
    }
}

#[cfg(feature = "onnx")]
mod runtime {
    use std::path::Path;

    use ndarray::{Array1, ArrayView2};
    use ort::session::{builder::GraphOptimizationLevel, Session};
    use ort::value::Value;
    use parking_lot::Mutex;

    use crate::engine::bundle::BundleError;
    use crate::engine::classifier::{check_width, Classifier, InferenceError};

    pub struct OnnxClassifier {
        /// `Session::run` needs exclusive access
        session: Mutex<Session>,
        output_name: String,
        num_features: usize,
        feature_names: Option<Vec<String>>,
    }

    impl OnnxClassifier {
        pub fn load(
            path: &Path,
            num_features: usize,
            feature_names: Option<Vec<String>>,
        ) -> Result<Self, BundleError> {
            tracing::info!(path = %path.display(), "Loading ONNX model");

            if !path.exists() {
                return Err(BundleError::InvalidModel(format!(
                    "ONNX model not found: {}",
                    path.display()
                )));
            }

            let session = Session::builder()
                .map_err(|e| BundleError::InvalidModel(format!("Failed to create session builder: {}", e)))?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(|e| BundleError::InvalidModel(format!("Failed to set optimization: {}", e)))?
                .with_intra_threads(1)
                .map_err(|e| BundleError::InvalidModel(format!("Failed to set threads: {}", e)))?
                .commit_from_file(path)
                .map_err(|e| BundleError::InvalidModel(format!("Failed to load model: {}", e)))?;

            let output_name = session
                .outputs
                .iter()
                .find(|o| o.name.contains("prob"))
                .or_else(|| session.outputs.last())
                .map(|o| o.name.clone())
                .ok_or_else(|| BundleError::InvalidModel("ONNX model defines no outputs".to_string()))?;

            tracing::info!(output = %output_name, "ONNX model loaded");

            Ok(Self {
                session: Mutex::new(session),
                output_name,
                num_features,
                feature_names,
            })
        }
    }

    impl Classifier for OnnxClassifier {
        fn kind(&self) -> &'static str {
            "onnx"
        }

        fn n_features(&self) -> usize {
            self.num_features
        }

        fn feature_names(&self) -> Option<&[String]> {
            self.feature_names.as_deref()
        }

        fn predict_proba(&self, rows: ArrayView2<'_, f32>) -> Result<Array1<f64>, InferenceError> {
            check_width(&rows, self.num_features)?;
            let n_rows = rows.nrows();

            let input_tensor = Value::from_array(rows.to_owned())
                .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![input_tensor])
                .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

            let output = outputs
                .get(&self.output_name)
                .ok_or_else(|| InferenceError(format!("No output named {}", self.output_name)))?;

            let (_, data) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

            // [N, 2] class probabilities, or a single positive-class column
            let probs: Array1<f64> = if data.len() == n_rows * 2 {
                (0..n_rows).map(|i| data[i * 2 + 1] as f64).collect()
            } else if data.len() == n_rows {
                data.iter().map(|&p| p as f64).collect()
            } else {
                return Err(InferenceError(format!(
                    "unexpected output size {} for {} rows",
                    data.len(),
                    n_rows
                )));
            };

            Ok(probs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_resolution() {
        let spec = OnnxSpec {
            path: PathBuf::from("model.onnx"),
            num_features: 10,
            feature_names: None,
        };
        assert_eq!(spec.resolve(Path::new("/srv/artifacts")), PathBuf::from("/srv/artifacts/model.onnx"));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_unsupported_without_feature() {
        let spec = OnnxSpec {
            path: PathBuf::from("model.onnx"),
            num_features: 10,
            feature_names: None,
        };
        assert!(matches!(spec.load(Path::new(".")), Err(BundleError::Unsupported("onnx"))));
    }
}
