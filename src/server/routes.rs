//! Router configuration for imgpress.
//!
//! This module defines the HTTP routes and applies the request middleware.
//!
//! # Route Structure
//!
//! ```text
//! /health             - Health check
//! /compress-upload    - Fetch, compress, and host an image (POST)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use imgpress::server::routes::{create_router, RouterConfig};
//! use imgpress::server::AppState;
//!
//! let state = AppState::new(fetcher, cloudinary, compressor, "compressed-images");
//! let router = create_router(state, RouterConfig::new());
//!
//! // Run the server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{compress_upload_handler, health_handler, AppState};
use crate::gateway::{AssetHost, ImageFetcher};

/// Default limit on request body size in bytes.
///
/// The only request body this service takes is a small JSON object with a
/// URL in it; anything larger is not a legitimate request.
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Maximum accepted request body size in bytes
    pub body_limit: usize,
}

impl RouterConfig {
    /// Create a router configuration with the defaults: tracing enabled
    /// and a 16KB body limit.
    pub fn new() -> Self {
        Self {
            enable_tracing: true,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the maximum accepted request body size in bytes.
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - The compress-upload endpoint
/// - The health check endpoint
/// - A request body size limit
/// - Request tracing (optional)
///
/// # Arguments
///
/// * `state` - Application state holding the gateways and the compressor
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router<F, U>(state: AppState<F, U>, config: RouterConfig) -> Router
where
    F: ImageFetcher + 'static,
    U: AssetHost + 'static,
{
    let router = Router::new()
        .route("/compress-upload", post(compress_upload_handler::<F, U>))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .with_state(state);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
