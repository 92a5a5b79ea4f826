//! Integration tests for the real HTTP gateways.
//!
//! These tests run the production fetcher and Cloudinary client against
//! in-process Axum stub servers on ephemeral ports.
//!
//! Tests verify:
//! - Fetching over a live connection (success, non-2xx, unreachable host)
//! - The signed multipart upload protocol, including signature verification
//! - Provider error bodies mapping to UploadError

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;

use imgpress::error::{FetchError, UploadError};
use imgpress::gateway::{
    build_http_client, compute_signature, AssetHost, CloudinaryClient, CloudinaryCredentials,
    HttpImageFetcher, ImageFetcher,
};

use super::test_utils::{create_gradient_jpeg, spawn_stub_server};

fn test_credentials() -> CloudinaryCredentials {
    CloudinaryCredentials {
        cloud_name: "demo".to_string(),
        api_key: "123456789".to_string(),
        api_secret: "test-secret".to_string(),
    }
}

// =============================================================================
// Fetch Gateway
// =============================================================================

fn image_stub_router() -> Router {
    let image = create_gradient_jpeg(32, 32);
    Router::new()
        .route(
            "/photo.jpg",
            get(move || async move { ([("content-type", "image/jpeg")], image.clone()) }),
        )
        .route(
            "/missing.jpg",
            get(|| async { (StatusCode::NOT_FOUND, "not here") }),
        )
}

#[tokio::test]
async fn test_fetch_success_over_live_connection() {
    let addr = spawn_stub_server(image_stub_router()).await;
    let fetcher = HttpImageFetcher::new(build_http_client(5).unwrap());

    let data = fetcher
        .fetch(&format!("http://{}/photo.jpg", addr))
        .await
        .unwrap();

    assert_eq!(data, Bytes::from(create_gradient_jpeg(32, 32)));
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let addr = spawn_stub_server(image_stub_router()).await;
    let fetcher = HttpImageFetcher::new(build_http_client(5).unwrap());

    let result = fetcher
        .fetch(&format!("http://{}/missing.jpg", addr))
        .await;

    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("Expected Status error, got {:?}", other.map(|b| b.len())),
    }
}

#[tokio::test]
async fn test_fetch_unreachable_host() {
    // Bind a port, remember it, and release it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpImageFetcher::new(build_http_client(5).unwrap());
    let result = fetcher.fetch(&format!("http://{}/photo.jpg", addr)).await;

    assert!(matches!(result, Err(FetchError::Request { .. })));
}

// =============================================================================
// Upload Gateway
// =============================================================================

/// The multipart fields one stub upload received.
#[derive(Debug, Clone, Default)]
struct ReceivedUpload {
    file: Option<Bytes>,
    api_key: Option<String>,
    timestamp: Option<String>,
    signature: Option<String>,
    folder: Option<String>,
}

type UploadLog = Arc<Mutex<Vec<ReceivedUpload>>>;

async fn upload_stub_handler(
    State(log): State<UploadLog>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut received = ReceivedUpload::default();

    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default().to_string().as_str() {
            "file" => received.file = Some(field.bytes().await.unwrap()),
            "api_key" => received.api_key = Some(field.text().await.unwrap()),
            "timestamp" => received.timestamp = Some(field.text().await.unwrap()),
            "signature" => received.signature = Some(field.text().await.unwrap()),
            "folder" => received.folder = Some(field.text().await.unwrap()),
            _ => {}
        }
    }

    log.lock().unwrap().push(received);

    Json(serde_json::json!({
        "secure_url": "https://res.cloudinary.com/demo/image/upload/compressed-images/abc123.jpg",
        "public_id": "compressed-images/abc123",
        "bytes": 1024,
    }))
}

fn upload_stub_router(log: UploadLog) -> Router {
    Router::new()
        .route("/v1_1/demo/image/upload", post(upload_stub_handler))
        .route("/v1_1/demo/ping", get(|| async { Json(serde_json::json!({"status": "ok"})) }))
        .with_state(log)
}

#[tokio::test]
async fn test_upload_sends_signed_multipart_form() {
    let log: UploadLog = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_stub_server(upload_stub_router(log.clone())).await;

    let cloudinary = CloudinaryClient::with_api_base(
        build_http_client(5).unwrap(),
        test_credentials(),
        format!("http://{}", addr),
    );

    let payload = Bytes::from(create_gradient_jpeg(16, 16));
    let result = cloudinary
        .upload(payload.clone(), "compressed-images")
        .await
        .unwrap();

    assert_eq!(
        result.secure_url,
        "https://res.cloudinary.com/demo/image/upload/compressed-images/abc123.jpg"
    );
    assert_eq!(result.public_id, "compressed-images/abc123");

    // Verify what went over the wire
    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    let upload = &received[0];

    assert_eq!(upload.file.as_ref().unwrap(), &payload);
    assert_eq!(upload.api_key.as_deref(), Some("123456789"));
    assert_eq!(upload.folder.as_deref(), Some("compressed-images"));

    // The signature must cover folder and timestamp with the account secret
    let timestamp = upload.timestamp.as_deref().unwrap();
    let expected = compute_signature(
        &[("folder", "compressed-images"), ("timestamp", timestamp)],
        "test-secret",
    );
    assert_eq!(upload.signature.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn test_upload_provider_rejection() {
    let router = Router::new().route(
        "/v1_1/demo/image/upload",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": {"message": "Invalid Signature"}})),
            )
        }),
    );
    let addr = spawn_stub_server(router).await;

    let cloudinary = CloudinaryClient::with_api_base(
        build_http_client(5).unwrap(),
        test_credentials(),
        format!("http://{}", addr),
    );

    let result = cloudinary
        .upload(Bytes::from_static(b"\xFF\xD8\xFF\xD9"), "compressed-images")
        .await;

    match result {
        Err(UploadError::Rejected { status, message }) => {
            assert_eq!(status, 401);
            // The provider error body was unwrapped to its message
            assert_eq!(message, "Invalid Signature");
        }
        other => panic!("Expected Rejected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upload_unparseable_success_body() {
    let router = Router::new().route(
        "/v1_1/demo/image/upload",
        post(|| async { "this is not json" }),
    );
    let addr = spawn_stub_server(router).await;

    let cloudinary = CloudinaryClient::with_api_base(
        build_http_client(5).unwrap(),
        test_credentials(),
        format!("http://{}", addr),
    );

    let result = cloudinary
        .upload(Bytes::from_static(b"\xFF\xD8\xFF\xD9"), "compressed-images")
        .await;

    assert!(matches!(result, Err(UploadError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_upload_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cloudinary = CloudinaryClient::with_api_base(
        build_http_client(5).unwrap(),
        test_credentials(),
        format!("http://{}", addr),
    );

    let result = cloudinary
        .upload(Bytes::from_static(b"\xFF\xD8\xFF\xD9"), "compressed-images")
        .await;

    assert!(matches!(result, Err(UploadError::Transport { .. })));
}

// =============================================================================
// Startup Ping
// =============================================================================

#[tokio::test]
async fn test_ping_success() {
    let log: UploadLog = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_stub_server(upload_stub_router(log)).await;

    let cloudinary = CloudinaryClient::with_api_base(
        build_http_client(5).unwrap(),
        test_credentials(),
        format!("http://{}", addr),
    );

    assert!(cloudinary.ping().await.is_ok());
}

#[tokio::test]
async fn test_ping_bad_credentials() {
    let router = Router::new().route(
        "/v1_1/demo/ping",
        get(|| async { (StatusCode::UNAUTHORIZED, "Invalid credentials") }),
    );
    let addr = spawn_stub_server(router).await;

    let cloudinary = CloudinaryClient::with_api_base(
        build_http_client(5).unwrap(),
        test_credentials(),
        format!("http://{}", addr),
    );

    let result = cloudinary.ping().await;
    match result {
        Err(UploadError::Rejected { status, .. }) => assert_eq!(status, 401),
        other => panic!("Expected Rejected error, got {:?}", other),
    }
}
