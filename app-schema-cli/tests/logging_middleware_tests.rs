#![allow(clippy::unwrap_used, clippy::expect_used)]

use app_schema_cli::logging::LoggingMiddleware;
use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower::ServiceExt;

async fn ok_handler() -> impl IntoResponse {
    (StatusCode::OK, "Success")
}

async fn echo_handler(body: String) -> impl IntoResponse {
    (StatusCode::OK, body)
}

async fn rejected_handler() -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        [("content-type", "application/json")],
        r#"{"valid":false,"errors":[]}"#,
    )
}

fn app_with_logging(verbose: u8) -> Router {
    let logging = LoggingMiddleware::new(verbose);
    Router::new()
        .route("/ok", get(ok_handler))
        .route("/echo", post(echo_handler))
        .route("/rejected", post(rejected_handler))
        .layer(middleware::from_fn(move |req, next| {
            let logging = logging.clone();
            async move { logging.handle(req, next).await }
        }))
}

async fn send(app: Router, method: Method, uri: &str, body: &'static str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_silent_middleware_passes_through() {
    let (status, body) = send(app_with_logging(0), Method::GET, "/ok", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success");
}

#[tokio::test]
async fn test_summary_logging_keeps_status() {
    let (status, _) = send(app_with_logging(1), Method::GET, "/ok", "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app_with_logging(1), Method::GET, "/missing", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_body_logging_preserves_request_body() {
    let (status, body) = send(app_with_logging(2), Method::POST, "/echo", "plain text data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "plain text data");
}

#[tokio::test]
async fn test_body_logging_preserves_json_bodies() {
    let (status, body) = send(
        app_with_logging(2),
        Method::POST,
        "/echo",
        r#"{"version":"1.0.0","platformVersion":"1.0.0"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["platformVersion"], "1.0.0");
}

#[tokio::test]
async fn test_body_logging_preserves_error_responses() {
    let (status, body) = send(app_with_logging(2), Method::POST, "/rejected", "{}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("\"valid\":false"));
}

#[tokio::test]
async fn test_body_logging_with_empty_body() {
    let (status, body) = send(app_with_logging(3), Method::GET, "/ok", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success");
}
