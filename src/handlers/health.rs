//! Health check handler

use axum::Json;

use crate::models::HealthResponse;

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
