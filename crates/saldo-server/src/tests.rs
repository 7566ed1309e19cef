//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

const BOUNDARY: &str = "saldo-test-boundary";

fn setup_test_app() -> Router {
    create_router_with_advisor(AdvisorClient::mock())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a multipart/form-data body from (field name, content) pairs
fn multipart_body(parts: &[(&str, &[u8])]) -> Body {
    let mut body = Vec::new();
    for (name, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    Body::from(body)
}

fn upload_request(parts: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(parts))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["advisor"]["model"], "mock");
    assert_eq!(json["advisor"]["healthy"], true);
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[("cuotasPendientes", b"3")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Missing file field");
}

#[tokio::test]
async fn test_upload_rejects_undecodable_workbook() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[("file", b"definitely not a workbook")]))
        .await
        .unwrap();

    // Decode failures are unrecovered and surface as a generic server error
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn test_upload_without_multipart_content_type_is_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .body(Body::from("plain body"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
