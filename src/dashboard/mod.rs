//! Interactive dashboard
//!
//! Form front-end for the scoring model. Predictions come either from the
//! in-process bundle (local mode) or from the prediction API (remote mode).

pub mod client;
pub mod form;
pub mod page;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Form, Router,
};
use tower_http::trace::TraceLayer;

pub use client::{ApiClient, ClientError};
pub use form::{FieldSpec, FormValues, FIELDS};
pub use page::Outcome;

use crate::engine::{ModelBundle, PredictError};
use crate::handlers;
use crate::models::{LoanInput, PredictionResponse};

/// Where predictions come from
pub enum Backend {
    Local(Arc<ModelBundle>),
    Remote(ApiClient),
}

/// Prediction failure, from either backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Local(#[from] PredictError),

    #[error("{0}")]
    Remote(#[from] ClientError),
}

impl Backend {
    pub async fn predict(&self, input: &LoanInput) -> Result<PredictionResponse, BackendError> {
        match self {
            Self::Local(bundle) => Ok(bundle.predict(input)?.into()),
            Self::Remote(client) => Ok(client.predict(input).await?),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Local(bundle) => format!("in-process model ({})", bundle.classifier_kind()),
            Self::Remote(client) => format!("prediction API at {}", client.base_url()),
        }
    }
}

#[derive(Clone)]
pub struct DashboardState {
    pub backend: Arc<Backend>,
}

impl DashboardState {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }
}

/// Create the dashboard router
pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", get(index).post(submit))
        .route("/healthz", get(handlers::health::check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<DashboardState>) -> Html<String> {
    Html(page::render(
        &form::default_values(),
        &Outcome::Empty,
        &state.backend.describe(),
    ))
}

async fn submit(
    State(state): State<DashboardState>,
    Form(values): Form<FormValues>,
) -> Html<String> {
    let outcome = match form::parse_form(&values) {
        Ok(input) => match state.backend.predict(&input).await {
            Ok(prediction) => Outcome::Prediction(prediction),
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                Outcome::Failure(e.to_string())
            }
        },
        Err(errors) => Outcome::FormErrors(errors),
    };

    Html(page::render(&values, &outcome, &state.backend.describe()))
}
