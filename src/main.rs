//! Loan Default Risk - Prediction API
//!
//! Loads the model bundle once and serves `POST /predict` and `GET /healthz`.
//! A bundle that fails to load halts startup.

use anyhow::Context;
use loan_risk::{config::Config, create_router, shutdown_signal, telemetry, AppState, ModelBundle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    telemetry::init("loan_risk=debug,tower_http=debug", config.log_format);

    tracing::info!("Loan Default API starting...");

    let bundle = ModelBundle::load(&config.bundle_path)
        .with_context(|| format!("Failed to load model bundle {}", config.bundle_path.display()))?;

    tracing::info!(
        features = ?bundle.feature_names(),
        loaded_at = %bundle.loaded_at(),
        "Serving {} classifier from {}",
        bundle.classifier_kind(),
        bundle.source()
    );

    let app = create_router(AppState::new(bundle));

    // Start server
    let addr = config.api_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
