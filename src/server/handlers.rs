//! HTTP request handlers for the compress-upload API.
//!
//! This module contains the Axum handlers for the compression pipeline and
//! health checks.
//!
//! # Endpoints
//!
//! - `POST /compress-upload` - Fetch, compress, and host an image
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::compress::SizeBoundCompressor;
use crate::error::{EncodeError, FetchError, UploadError};
use crate::gateway::{AssetHost, ImageFetcher};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the compress-upload pipeline.
///
/// This is passed to all handlers via Axum's State extractor. Generic over
/// the two gateway traits so tests can plug in fakes.
pub struct AppState<F: ImageFetcher, U: AssetHost> {
    /// Retrieves source images
    pub fetcher: Arc<F>,

    /// Publishes compressed results
    pub asset_host: Arc<U>,

    /// The size-bound compression loop
    pub compressor: Arc<SizeBoundCompressor>,

    /// Logical folder uploads are filed under
    pub upload_folder: String,
}

impl<F: ImageFetcher, U: AssetHost> AppState<F, U> {
    /// Create a new application state.
    pub fn new(
        fetcher: F,
        asset_host: U,
        compressor: SizeBoundCompressor,
        upload_folder: impl Into<String>,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            asset_host: Arc::new(asset_host),
            compressor: Arc::new(compressor),
            upload_folder: upload_folder.into(),
        }
    }
}

impl<F: ImageFetcher, U: AssetHost> Clone for AppState<F, U> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            asset_host: Arc::clone(&self.asset_host),
            compressor: Arc::clone(&self.compressor),
            upload_folder: self.upload_folder.clone(),
        }
    }
}

// =============================================================================
// Request and Response Types
// =============================================================================

/// Request body for the compress-upload endpoint.
#[derive(Debug, Deserialize)]
pub struct CompressUploadRequest {
    /// URL of the source image; required and non-empty
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Success response from the compress-upload endpoint.
#[derive(Debug, Serialize)]
pub struct CompressUploadResponse {
    /// Always `true` on the success path
    pub success: bool,

    /// Publicly resolvable URL of the hosted image
    #[serde(rename = "cloudinaryUrl")]
    pub cloudinary_url: String,

    /// Human-readable status note
    pub note: String,
}

/// JSON error response; the wire shape is always `{"error": <message>}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors the compress-upload pipeline surfaces to HTTP.
///
/// Validation failures map to 400 with the documented body. Every runtime
/// failure maps to the same generic 500 body; the specific error and the
/// stage it happened in are logged, never returned to the caller.
#[derive(Debug)]
pub enum PipelineError {
    /// Request body is not a JSON object with a non-empty `imageUrl` string
    MissingImageUrl,

    /// Source image retrieval failed
    Fetch(FetchError),

    /// Source could not be decoded or re-encoded
    Compress(EncodeError),

    /// The asset host was unreachable or rejected the upload
    Upload(UploadError),
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        PipelineError::Fetch(err)
    }
}

impl From<EncodeError> for PipelineError {
    fn from(err: EncodeError) -> Self {
        PipelineError::Compress(err)
    }
}

impl From<UploadError> for PipelineError {
    fn from(err: UploadError) -> Self {
        PipelineError::Upload(err)
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (stage, detail) = match &self {
            PipelineError::MissingImageUrl => {
                let status = StatusCode::BAD_REQUEST;
                warn!(
                    status = status.as_u16(),
                    "Rejected request without a usable 'imageUrl'"
                );
                let body = ErrorResponse::new("Missing 'imageUrl' field");
                return (status, Json(body)).into_response();
            }
            PipelineError::Fetch(err) => ("fetch", err.to_string()),
            PipelineError::Compress(err) => ("compress", err.to_string()),
            PipelineError::Upload(err) => ("upload", err.to_string()),
        };

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        error!(
            stage = stage,
            status = status.as_u16(),
            "Pipeline error: {}",
            detail
        );

        // The caller only ever sees the generic message; the detail above
        // stays in the logs
        let body = ErrorResponse::new("Failed to compress or upload image");
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle compress-upload requests.
///
/// # Endpoint
///
/// `POST /compress-upload`
///
/// # Request Body
///
/// ```json
/// { "imageUrl": "https://example.com/photo.jpg" }
/// ```
///
/// # Response
///
/// - `200 OK`: `{"success":true,"cloudinaryUrl":"...","note":"Image compressed & uploaded successfully"}`
/// - `400 Bad Request`: `{"error":"Missing 'imageUrl' field"}`
/// - `500 Internal Server Error`: `{"error":"Failed to compress or upload image"}`
///
/// The pipeline is strictly sequential per request: fetch the source,
/// compress it under the configured target, upload the result. Any stage
/// failing aborts the request; later stages never run.
pub async fn compress_upload_handler<F: ImageFetcher, U: AssetHost>(
    State(state): State<AppState<F, U>>,
    body: Result<Json<CompressUploadRequest>, JsonRejection>,
) -> Result<Json<CompressUploadResponse>, PipelineError> {
    // A body that is not parseable JSON fails validation the same way a
    // missing field does: the caller's contract is a JSON object with a
    // non-empty `imageUrl` string.
    let Json(request) = body.map_err(|_| PipelineError::MissingImageUrl)?;

    let image_url = match request.image_url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(PipelineError::MissingImageUrl),
    };

    info!(url = %image_url, "Fetching image");
    let original = state.fetcher.fetch(&image_url).await?;
    info!(size_kb = original.len() / 1024, "Original image size");

    let outcome = state.compressor.compress(&original)?;
    info!(
        size_kb = outcome.data.len() / 1024,
        quality = outcome.quality,
        attempts = outcome.attempts,
        "Compressed image"
    );

    let uploaded = state
        .asset_host
        .upload(outcome.data, &state.upload_folder)
        .await?;
    info!(url = %uploaded.secure_url, public_id = %uploaded.public_id, "Uploaded image");

    Ok(Json(CompressUploadResponse {
        success: true,
        cloudinary_url: uploaded.secure_url,
        note: "Image compressed & uploaded successfully".to_string(),
    }))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
