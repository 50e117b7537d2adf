#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loan_risk::engine::{Classifier, InferenceError};
use loan_risk::models::{Feature, LoanInput};
use loan_risk::ModelBundle;
use ndarray::{Array1, ArrayView2};

pub fn artifact_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts/loan_default_xgb.json")
}

pub fn load_bundle() -> ModelBundle {
    ModelBundle::load(artifact_path()).expect("shipped artifact loads")
}

pub fn canonical_features() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// Borrower the shipped model scores as high risk
pub fn risky_input() -> LoanInput {
    LoanInput {
        credit_utilization_ratio: 0.95,
        debt_to_income_ratio: 0.8,
        monthly_income: 1000.0,
        borrower_age: 25,
        open_loans_count: 2,
        real_estate_loans_count: 0,
        times_30_59_days_late: 2,
        times_60_89_days_late: 1,
        times_90_days_late: 1,
        number_of_dependents: 4,
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Expected probability from the shipped forest for a given leaf sum
pub fn shipped_probability(leaf_sum: f64) -> f64 {
    sigmoid((0.07f64 / 0.93).ln() + leaf_sum)
}

/// Returns a fixed probability and counts how often it was asked
pub struct CountingClassifier {
    pub calls: Arc<AtomicUsize>,
    pub probability: f64,
}

impl Classifier for CountingClassifier {
    fn kind(&self) -> &'static str {
        "counting"
    }

    fn n_features(&self) -> usize {
        10
    }

    fn predict_proba(&self, rows: ArrayView2<'_, f32>) -> Result<Array1<f64>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Array1::from_elem(rows.nrows(), self.probability))
    }
}

pub fn counting_bundle(probability: f64, threshold: f64) -> (ModelBundle, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let classifier = CountingClassifier {
        calls: calls.clone(),
        probability,
    };
    let bundle = ModelBundle::new(Box::new(classifier), threshold, canonical_features())
        .expect("counting bundle is valid");
    (bundle, calls)
}
