//! HTTP server layer for imgpress.
//!
//! This module provides the HTTP API for the compress-upload pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                   POST /compress-upload                         │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │         handlers         │  │           routes            │  │
//! │  │  (validate → fetch →     │  │      (router config)        │  │
//! │  │   compress → upload)     │  │                             │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    compress_upload_handler, health_handler, AppState, CompressUploadRequest,
    CompressUploadResponse, ErrorResponse, HealthResponse, PipelineError,
};
pub use routes::{create_router, RouterConfig, DEFAULT_BODY_LIMIT};
