//! Prediction wire types

use serde::{Deserialize, Serialize};

use crate::engine::{Decision, Prediction};

/// `POST /predict` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prob_default: f64,
    pub decision: Decision,
    pub threshold: f64,
}

impl From<Prediction> for PredictionResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prob_default: p.probability,
            decision: p.decision,
            threshold: p.threshold,
        }
    }
}

/// `GET /healthz` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok".to_string() }
    }
}

/// Error envelope returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}
