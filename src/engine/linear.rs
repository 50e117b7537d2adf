//! Logistic regression

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::Deserialize;

use super::bundle::BundleError;
use super::classifier::{check_width, sigmoid, Classifier, InferenceError};

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.coefficients.is_empty() {
            return Err(BundleError::InvalidModel("logistic model has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(BundleError::InvalidModel(
                "logistic model has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }

    fn decision_function(&self, row: ArrayView1<'_, f32>) -> f64 {
        self.coefficients
            .iter()
            .zip(row.iter())
            .fold(self.intercept, |acc, (w, &x)| acc + w * x as f64)
    }
}

impl Classifier for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, rows: ArrayView2<'_, f32>) -> Result<Array1<f64>, InferenceError> {
        check_width(&rows, self.coefficients.len())?;
        Ok(rows
            .outer_iter()
            .map(|row| sigmoid(self.decision_function(row)))
            .collect())
    }
}
