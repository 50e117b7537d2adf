//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use uuid::Uuid;

use crate::engine::PredictError;
use crate::models::{LoanInput, PredictionResponse};
use crate::{AppResult, AppState};

/// Score one borrower. Validation runs before the classifier is invoked.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<LoanInput>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(input) = payload?;

    let span = tracing::info_span!("predict", request_id = %Uuid::new_v4());
    let prediction = span.in_scope(|| match state.bundle.predict(&input) {
        Ok(p) => {
            tracing::info!(
                prob_default = p.probability,
                decision = %p.decision,
                latency_us = p.inference_time_us,
                "Prediction served"
            );
            Ok(p)
        }
        Err(PredictError::Invalid(e)) => {
            tracing::debug!("Rejected input: {}", e);
            Err(PredictError::Invalid(e))
        }
        Err(e) => Err(e),
    })?;

    Ok(Json(prediction.into()))
}
