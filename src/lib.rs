//! # imgpress
//!
//! An HTTP service that fetches remote images, compresses them under a byte
//! budget, and publishes the result to Cloudinary.
//!
//! The core is a size-constrained compression loop: a first-fit search over
//! the JPEG quality parameter, walking down from quality 90 in steps of 10
//! until the re-encoded image fits the configured target. If no quality in
//! the schedule fits, the floor-quality result is returned as a best effort.
//!
//! ## Features
//!
//! - **Size-bound compression**: Descending quality search with a bounded
//!   number of encoder invocations and a best-effort fallback
//! - **Format support**: Decodes JPEG, PNG, WebP, and GIF sources; always
//!   emits JPEG
//! - **Pluggable gateways**: Fetch and upload are traits, so the pipeline is
//!   testable against in-memory fakes
//! - **Signed uploads**: Implements Cloudinary's SHA-1 signed upload protocol
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`compress`] - The JPEG encoder and the size-bound search loop
//! - [`gateway`] - Outbound HTTP: image fetcher and Cloudinary client
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types for each pipeline stage
//!
//! ## Example
//!
//! ```rust,no_run
//! use imgpress::{
//!     build_http_client, AppState, CloudinaryClient, CloudinaryCredentials, HttpImageFetcher,
//!     RouterConfig, SizeBoundCompressor,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = build_http_client(30).unwrap();
//!     let credentials = CloudinaryCredentials {
//!         cloud_name: "demo".to_string(),
//!         api_key: "key".to_string(),
//!         api_secret: "secret".to_string(),
//!     };
//!
//!     let state = AppState::new(
//!         HttpImageFetcher::new(client.clone()),
//!         CloudinaryClient::new(client, credentials),
//!         SizeBoundCompressor::new(250),
//!         "compressed-images",
//!     );
//!     let router = imgpress::create_router(state, RouterConfig::new());
//!
//!     // Start the server...
//! }
//! ```

pub mod compress;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;

// Re-export commonly used types
pub use compress::{
    clamp_quality, CompressionObserver, CompressionOutcome, JpegQualityEncoder,
    SizeBoundCompressor, TracingObserver, DEFAULT_TARGET_KB, INITIAL_QUALITY, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY, QUALITY_FLOOR, QUALITY_STEP,
};
pub use config::Config;
pub use error::{EncodeError, FetchError, UploadError};
pub use gateway::{
    build_http_client, compute_signature, signature_base, AssetHost, CloudinaryClient,
    CloudinaryCredentials, HttpImageFetcher, ImageFetcher, UploadResult, DEFAULT_API_BASE,
};
pub use server::{
    compress_upload_handler, create_router, health_handler, AppState, CompressUploadRequest,
    CompressUploadResponse, ErrorResponse, HealthResponse, PipelineError, RouterConfig,
};
