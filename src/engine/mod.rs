//! Inference Engine
//!
//! Model bundle loading, classifier backends and decision thresholding.

pub mod bundle;
pub mod classifier;
pub mod linear;
pub mod onnx;
pub mod threshold;
pub mod trees;

// Re-export common types
pub use bundle::{BundleError, ModelBundle, PredictError, Prediction};
pub use classifier::{Classifier, InferenceError, ModelSpec};
pub use threshold::{Decision, Threshold};
