#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use quotedesk_api::config::{LogFormat, ServerConfig};
use quotedesk_api::mailer::{MailConfig, Mailer};
use quotedesk_api::router::build_app_router;
use quotedesk_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and no SMTP.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        mail: None,
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Like [`build_test_app`], with an SMTP mailer for `localhost:1`. Nothing
/// listens there, so every delivery fails with a connection error.
pub fn build_test_app_with_unreachable_smtp(pool: PgPool) -> Router {
    let mail = MailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1,
        from_address: "quotes@quotedesk.test".to_string(),
        smtp_user: None,
        smtp_password: None,
    };
    let mailer = Mailer::new(&mail).expect("mailer for unreachable host");
    build_app(pool, Some(Arc::new(mailer)))
}

fn build_app(pool: PgPool, mailer: Option<Arc<Mailer>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::delete(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a vendor through the API and return its id.
pub async fn create_vendor(pool: &PgPool, body: serde_json::Value) -> i64 {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/vendors", body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// A complete shipping quote body for the given vendor.
pub fn shipping_quote(vendor_id: i64, vendor_name: &str, cost: f64, currency: &str) -> serde_json::Value {
    serde_json::json!({
        "vendorId": vendor_id,
        "vendorName": vendor_name,
        "vendorType": "shipping",
        "validUntil": "2030-12-31",
        "origin": "基隆港",
        "destination": "寧波港",
        "containerSize": "40HQ",
        "lineItems": [
            {"description": "Ocean freight", "cost": cost, "currency": currency}
        ]
    })
}
