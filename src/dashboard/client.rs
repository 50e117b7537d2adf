//! Prediction API Client
//!
//! HTTP client the dashboard uses in remote mode. Failures are reported
//! once; there is no retry.

use std::time::Duration;

use crate::models::{ErrorResponse, HealthResponse, LoanInput, PredictionResponse};

/// Client errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Could not reach the prediction API: {0}")]
    NetworkError(String),

    #[error("Prediction API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Unexpected response from the prediction API: {0}")]
    ParseError(String),
}

/// Prediction API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create new client with a fixed request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/healthz", self.base_url);

        let response = self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            Err(ClientError::ServerError {
                status: response.status().as_u16(),
                message: response.status().to_string(),
            })
        }
    }

    /// Score one borrower remotely
    pub async fn predict(&self, input: &LoanInput) -> Result<PredictionResponse, ClientError> {
        let url = format!("{}/predict", self.base_url);

        let response = self.http_client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            return response.json().await
                .map_err(|e| ClientError::ParseError(e.to_string()));
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);

        tracing::warn!("Prediction API returned {}: {}", status, message);
        Err(ClientError::ServerError { status, message })
    }
}
