//! Loan Default Risk
//!
//! Scores borrowers with a pre-trained default classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────┐
//! │  Dashboard (form)    │─HTTP──▶│  Prediction API (Axum)       │
//! │  loan-risk-dashboard │        │  POST /predict, GET /healthz │
//! └──────────┬───────────┘        └──────────────┬───────────────┘
//!            │ local mode                        │
//!            ▼                                   ▼
//!     ┌─────────────────────────────────────────────────┐
//!     │  ModelBundle {model, threshold, features}       │
//!     │  loaded once, read-only                         │
//!     └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use engine::ModelBundle;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bundle: Arc<ModelBundle>,
}

impl AppState {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
        }
    }
}

/// Create the prediction API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Resolves when Ctrl-C is received
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
