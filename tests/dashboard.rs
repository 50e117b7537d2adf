mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use tower::ServiceExt;

use common::{load_bundle, risky_input};
use loan_risk::dashboard::{self, form, page, ApiClient, Backend, ClientError, DashboardState, FormValues};
use loan_risk::models::{Feature, LoanInput};
use loan_risk::{create_router, AppState};

fn local_dashboard() -> Router {
    dashboard::create_router(DashboardState::new(Backend::Local(Arc::new(load_bundle()))))
}

fn remote_dashboard(base_url: &str) -> Router {
    let client = ApiClient::new(base_url, Duration::from_secs(5)).unwrap();
    dashboard::create_router(DashboardState::new(Backend::Remote(client)))
}

async fn spawn_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(load_bundle()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// API whose `/predict` answers after `delay`; returns its URL and hit counter
async fn spawn_slow_api(delay: Duration) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/predict",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                StatusCode::OK
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

/// Address nothing is listening on
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn values_for(input: &LoanInput) -> FormValues {
    Feature::ALL
        .iter()
        .map(|&f| (f.name().to_string(), input.value(f).to_string()))
        .collect()
}

fn encode(values: &FormValues) -> String {
    values
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    read(app.oneshot(request).await.unwrap()).await
}

async fn submit(app: Router, values: &FormValues) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encode(values)))
        .unwrap();
    let (status, html) = read(app.oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    html
}

async fn read(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_renders_form_with_defaults() {
    let (status, html) = get_page(local_dashboard(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Loan Default Predictor"));
    assert!(html.contains("Predict risk"));
    for field in &form::FIELDS {
        assert!(html.contains(&format!(r#"name="{}""#, field.name())));
    }
    assert!(html.contains(r#"name="Monthly_Income" min="0" max="50000" step="50" value="2500""#));
    assert!(html.contains("in-process model (tree_ensemble)"));
}

#[tokio::test]
async fn test_dashboard_healthz() {
    let (status, body) = get_page(local_dashboard(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_local_prediction_low_risk() {
    let expected = load_bundle().predict(&LoanInput::default()).unwrap();
    let html = submit(local_dashboard(), &form::default_values()).await;

    assert!(html.contains("Probability of Default"));
    assert!(html.contains(&page::format_probability(expected.probability)));
    assert!(html.contains(r#"<div class="badge success">Decision: LOW_RISK • Threshold: 0.250</div>"#));
}

#[tokio::test]
async fn test_local_prediction_high_risk() {
    let html = submit(local_dashboard(), &values_for(&risky_input())).await;
    assert!(html.contains(r#"<div class="badge error">Decision: HIGH_RISK • Threshold: 0.250</div>"#));
}

#[tokio::test]
async fn test_submitted_values_are_echoed() {
    let mut values = form::default_values();
    values.insert("Borrower_Age".to_string(), "61".to_string());
    let html = submit(local_dashboard(), &values).await;
    assert!(html.contains(r#"name="Borrower_Age" min="18" max="100" step="1" value="61""#));
}

#[tokio::test]
async fn test_form_errors_are_shown() {
    let mut values = form::default_values();
    values.insert("Borrower_Age".to_string(), "10".to_string());
    let html = submit(local_dashboard(), &values).await;

    assert!(html.contains("Borrower Age (years) must be between 18 and 100"));
    assert!(!html.contains("Probability of Default"));
}

#[tokio::test]
async fn test_remote_prediction_matches_local() {
    let base_url = spawn_api().await;
    let expected = load_bundle().predict(&risky_input()).unwrap();

    let html = submit(remote_dashboard(&base_url), &values_for(&risky_input())).await;
    assert!(html.contains(&page::format_probability(expected.probability)));
    assert!(html.contains("HIGH_RISK"));
    assert!(html.contains(&format!("prediction API at {}", base_url)));
}

#[tokio::test]
async fn test_remote_network_failure_is_displayed() {
    let base_url = dead_url().await;
    let html = submit(remote_dashboard(&base_url), &form::default_values()).await;

    assert!(html.contains("Could not reach the prediction API"));
    assert!(!html.contains("Probability of Default"));
}

#[tokio::test]
async fn test_remote_timeout_is_displayed_without_retry() {
    let (base_url, hits) = spawn_slow_api(Duration::from_secs(3)).await;
    let client = ApiClient::new(base_url, Duration::from_millis(200)).unwrap();
    let app = dashboard::create_router(DashboardState::new(Backend::Remote(client)));

    let started = std::time::Instant::now();
    let html = submit(app, &form::default_values()).await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(html.contains("Could not reach the prediction API"));
    assert!(!html.contains("Probability of Default"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_client_health_check() {
    let base_url = spawn_api().await;
    let client = ApiClient::new(format!("{}/", base_url), Duration::from_secs(5)).unwrap();
    assert_eq!(client.base_url(), base_url);
    assert_eq!(client.health_check().await.unwrap().status, "ok");
}

#[tokio::test]
async fn test_client_surfaces_server_validation() {
    let base_url = spawn_api().await;
    let client = ApiClient::new(base_url, Duration::from_secs(5)).unwrap();

    let input = LoanInput { borrower_age: 10, ..Default::default() };
    match client.predict(&input).await {
        Err(ClientError::ServerError { status, message }) => {
            assert_eq!(status, 422);
            assert!(message.contains("Borrower_Age"), "{}", message);
        }
        other => panic!("expected server error, got {:?}", other),
    }
}
