//! Integration tests for the non-domain HTTP surface.
//!
//! Tests cover:
//! - The welcome root, health, and status endpoints
//! - OpenAPI document and Swagger UI routes
//! - Request id propagation
//! - The in-memory store backend serving the same API

mod common;

use std::sync::Arc;

use axum::{body, http::Method, response::Response, Router};
use common::TestApp;
use serde_json::{json, Value};
use storefront_api::{
    config::AppConfig,
    events::{self, EventSender},
    handlers::AppServices,
    stores::{InMemoryCartStore, InMemoryCatalogStore, InMemoryUserStore},
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

// ==================== Root and Probe Endpoints ====================

#[tokio::test]
async fn welcome_returns_greeting() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/", None).await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body, json!({ "message": "Welcome to our E-commerce API" }));
}

#[tokio::test]
async fn health_reports_database_healthy() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["database"], "healthy");
}

#[tokio::test]
async fn status_reports_service_metadata() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/status", None).await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["service"], "storefront-api");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["data"]["store_backend"], "database");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/nope", None).await;
    assert_eq!(response.status(), 404);
}

// ==================== Documentation Endpoints ====================

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), 200);

    let doc = response_json(response).await;
    assert!(doc["openapi"]
        .as_str()
        .expect("openapi version")
        .starts_with("3."));

    let paths = doc["paths"].as_object().expect("paths object");
    for path in [
        "/products",
        "/products/{id}",
        "/cart",
        "/cart/{user_id}",
        "/checkout/{user_id}",
        "/register",
        "/login",
    ] {
        assert!(paths.contains_key(path), "missing path {}", path);
    }
}

#[tokio::test]
async fn swagger_ui_is_mounted() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/docs", None).await;
    assert!(
        response.status().is_success() || response.status().is_redirection(),
        "unexpected status {}",
        response.status()
    );
}

// ==================== Request Id Propagation ====================

#[tokio::test]
async fn responses_echo_a_supplied_request_id() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(Method::GET, "/", None, &[("x-request-id", "it-42")])
        .await;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("it-42")
    );
}

#[tokio::test]
async fn responses_get_a_generated_request_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/", None).await;
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("generated request id header");
    assert!(!header.is_empty());
}

#[tokio::test]
async fn status_payload_carries_the_request_id() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(Method::GET, "/status", None, &[("x-request-id", "it-7")])
        .await;
    let body = response_json(response).await;
    assert_eq!(body["meta"]["request_id"], "it-7");
}

// ==================== In-Memory Backend ====================

async fn in_memory_router() -> Router {
    let mut cfg = AppConfig::new(
        "unused://in-memory".to_string(),
        "127.0.0.1".to_string(),
        18_081,
        "development".to_string(),
    );
    cfg.store_backend = "in-memory".to_string();

    let (event_tx, event_rx) = mpsc::channel(64);
    let event_sender = EventSender::new(event_tx);
    tokio::spawn(events::process_events(event_rx));

    let services = AppServices::new(
        Arc::new(InMemoryCatalogStore::new()),
        Arc::new(InMemoryCartStore::new()),
        Arc::new(InMemoryUserStore::new()),
        Arc::new(event_sender.clone()),
    );

    let state = Arc::new(AppState {
        db: None,
        config: cfg,
        event_sender,
        services,
    });

    storefront_api::api_routes().with_state(state)
}

async fn send_json(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let body = if let Some(json) = body {
        builder = builder.header("content-type", "application/json");
        axum::body::Body::from(serde_json::to_vec(&json).expect("request body"))
    } else {
        axum::body::Body::empty()
    };
    router
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("router error")
}

#[tokio::test]
async fn in_memory_backend_serves_the_same_api() {
    let router = in_memory_router().await;

    let response = send_json(
        &router,
        Method::POST,
        "/products",
        Some(json!({ "name": "Keyboard", "price": "45.00" })),
    )
    .await;
    assert_eq!(response.status(), 201);

    let product = response_json(response).await;
    let product_id = product["id"].as_str().expect("product id").to_string();

    let response = send_json(
        &router,
        Method::POST,
        "/cart",
        Some(json!({ "user_id": "m1", "product_id": product_id, "quantity": 2 })),
    )
    .await;
    assert_eq!(response.status(), 201);

    let summary = response_json(send_json(&router, Method::POST, "/checkout/m1", None).await).await;
    assert_eq!(summary["lines"].as_array().expect("lines").len(), 1);
    assert_eq!(summary["total"], "90.00");
}

#[tokio::test]
async fn in_memory_backend_health_has_no_database() {
    let router = in_memory_router().await;

    let response = send_json(&router, Method::GET, "/health", None).await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["database"], "in-memory");
}
