mod common;

use common::{artifact_path, load_bundle, risky_input, shipped_probability};
use loan_risk::engine::Decision;
use loan_risk::models::LoanInput;

#[test]
fn test_bundle_exposes_exactly_three_keys() {
    let raw = std::fs::read_to_string(artifact_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["features", "model", "threshold"]);
}

#[test]
fn test_feature_list() {
    let bundle = load_bundle();
    let features = bundle.feature_names();
    assert_eq!(features.len(), 10);
    assert_eq!(features[0], "Credit_Utilization_Ratio");
}

#[test]
fn test_threshold_in_unit_interval() {
    let t = load_bundle().threshold().value();
    assert!((0.0..=1.0).contains(&t));
    assert_eq!(t, 0.25);
}

#[test]
fn test_default_borrower_is_low_risk() {
    let bundle = load_bundle();
    let prediction = bundle.predict(&LoanInput::default()).unwrap();

    assert!((prediction.probability - shipped_probability(-1.35)).abs() < 1e-6);
    assert_eq!(prediction.decision, Decision::LowRisk);
}

#[test]
fn test_risky_borrower_is_high_risk() {
    let bundle = load_bundle();
    let prediction = bundle.predict(&risky_input()).unwrap();

    assert!((prediction.probability - shipped_probability(2.35)).abs() < 1e-6);
    assert_eq!(prediction.decision, Decision::HighRisk);
}

#[test]
fn test_prediction_is_deterministic() {
    let bundle = load_bundle();
    let input = risky_input();
    let first = bundle.predict(&input).unwrap();
    for _ in 0..5 {
        let again = bundle.predict(&input).unwrap();
        assert_eq!(again.probability, first.probability);
        assert_eq!(again.decision, first.decision);
    }
}

#[test]
fn test_tampered_bundle_fails_to_load() {
    let raw = std::fs::read_to_string(artifact_path()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["features"].as_array_mut().unwrap().pop();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    std::fs::write(&path, value.to_string()).unwrap();

    assert!(loan_risk::ModelBundle::load(&path).is_err());
}
