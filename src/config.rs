//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Serialized model bundle
    pub bundle_path: PathBuf,

    /// Bind address for both servers
    pub host: IpAddr,

    /// Prediction API port
    pub port: u16,

    /// Dashboard port
    pub dashboard_port: u16,

    /// Base URL of the prediction API. When set the dashboard calls it
    /// over HTTP instead of loading the bundle in-process.
    pub api_url: Option<String>,

    /// Dashboard HTTP client timeout
    pub request_timeout_secs: u64,

    /// `LOG_FORMAT`, or JSON when unset in production
    pub log_format: LogFormat,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        // Production logs default to JSON
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(f) if f.eq_ignore_ascii_case("text") => LogFormat::Text,
            _ if environment == "production" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            bundle_path: lookup("MODEL_BUNDLE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("artifacts/loan_default_xgb.json")),

            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            dashboard_port: lookup("DASHBOARD_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8501),

            api_url: lookup("PREDICTION_API_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),

            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .filter(|&t| t > 0)
                .unwrap_or(10),

            log_format,
            environment,
        }
    }

    pub fn api_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn dashboard_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.dashboard_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
