//! Loan Default Risk - Dashboard
//!
//! Serves the scoring form. With `PREDICTION_API_URL` set, predictions go
//! through the API; otherwise the bundle is loaded in-process and a load
//! failure stops the dashboard.

use std::sync::Arc;

use anyhow::Context;
use loan_risk::config::Config;
use loan_risk::dashboard::{self, ApiClient, Backend, DashboardState};
use loan_risk::{shutdown_signal, telemetry, ModelBundle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    telemetry::init("loan_risk=debug,tower_http=info", config.log_format);

    let backend = match &config.api_url {
        Some(url) => {
            let client = ApiClient::new(url.as_str(), config.request_timeout())?;
            match client.health_check().await {
                Ok(_) => tracing::info!("Prediction API reachable at {}", url),
                Err(e) => tracing::warn!("Prediction API not reachable yet: {}", e),
            }
            Backend::Remote(client)
        }
        None => {
            let bundle = ModelBundle::load(&config.bundle_path).with_context(|| {
                format!("Failed to load model bundle {}", config.bundle_path.display())
            })?;
            Backend::Local(Arc::new(bundle))
        }
    };

    tracing::info!("Dashboard scoring with {}", backend.describe());

    let app = dashboard::create_router(DashboardState::new(backend));

    let addr = config.dashboard_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
