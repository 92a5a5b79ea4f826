//! Configuration management for imgpress.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use imgpress::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("Size target: {}KB", config.target_kb);
//! ```
//!
//! # Environment Variables
//!
//! The provider credentials and port keep their conventional names; every
//! other option uses the `IMGPRESS_` prefix:
//!
//! - `CLOUDINARY_CLOUD_NAME` - Cloudinary account identifier (required)
//! - `CLOUDINARY_API_KEY` - Cloudinary API key (required)
//! - `CLOUDINARY_API_SECRET` - Cloudinary API secret (required)
//! - `PORT` - Server port (default: 3000)
//! - `IMGPRESS_HOST` - Server bind address (default: 0.0.0.0)
//! - `IMGPRESS_TARGET_KB` - Output size target in KB (default: 250)
//! - `IMGPRESS_UPLOAD_FOLDER` - Logical folder for hosted assets (default: compressed-images)
//! - `IMGPRESS_HTTP_TIMEOUT` - Outbound request timeout in seconds (default: 30)

use clap::Parser;

use crate::compress::DEFAULT_TARGET_KB;
use crate::gateway::{CloudinaryCredentials, DEFAULT_API_BASE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default logical folder hosted assets are filed under.
pub const DEFAULT_UPLOAD_FOLDER: &str = "compressed-images";

/// Default timeout in seconds for outbound fetch and upload requests.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// CLI Arguments
// =============================================================================

/// imgpress - Fetch, size-bound compress, and host images.
///
/// Fetches a remote image over HTTP, walks the JPEG quality down until the
/// result fits a byte budget, and publishes it to Cloudinary.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgpress")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "IMGPRESS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Cloudinary Configuration
    // =========================================================================
    /// Cloudinary account identifier (the cloud_name in API URLs).
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    pub cloud_name: String,

    /// Cloudinary API key.
    #[arg(long, env = "CLOUDINARY_API_KEY")]
    pub api_key: String,

    /// Cloudinary API secret used for upload signing.
    #[arg(long, env = "CLOUDINARY_API_SECRET")]
    pub api_secret: String,

    /// Logical folder hosted assets are filed under.
    #[arg(long, default_value = DEFAULT_UPLOAD_FOLDER, env = "IMGPRESS_UPLOAD_FOLDER")]
    pub upload_folder: String,

    /// Asset-host API base URL.
    ///
    /// Only override this to point at a stub or self-hosted endpoint.
    #[arg(long, default_value = DEFAULT_API_BASE, env = "IMGPRESS_API_BASE")]
    pub api_base: String,

    /// Skip the provider connectivity check at startup.
    #[arg(long, default_value_t = false, env = "IMGPRESS_SKIP_STARTUP_PING")]
    pub skip_startup_ping: bool,

    // =========================================================================
    // Compression Configuration
    // =========================================================================
    /// Output size target in kilobytes.
    #[arg(long, default_value_t = DEFAULT_TARGET_KB, env = "IMGPRESS_TARGET_KB")]
    pub target_kb: u32,

    // =========================================================================
    // Outbound HTTP Configuration
    // =========================================================================
    /// Timeout in seconds for outbound fetch and upload requests.
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS, env = "IMGPRESS_HTTP_TIMEOUT")]
    pub http_timeout: u64,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // All three provider secrets are required
        if self.cloud_name.is_empty() {
            return Err(
                "Cloudinary cloud name is required. Set --cloud-name or CLOUDINARY_CLOUD_NAME"
                    .to_string(),
            );
        }
        if self.api_key.is_empty() {
            return Err(
                "Cloudinary API key is required. Set --api-key or CLOUDINARY_API_KEY".to_string(),
            );
        }
        if self.api_secret.is_empty() {
            return Err(
                "Cloudinary API secret is required. Set --api-secret or CLOUDINARY_API_SECRET"
                    .to_string(),
            );
        }

        if self.upload_folder.is_empty() {
            return Err("upload_folder must not be empty".to_string());
        }

        if self.api_base.is_empty() {
            return Err("api_base must not be empty".to_string());
        }

        if self.target_kb == 0 {
            return Err("target_kb must be greater than 0".to_string());
        }

        if self.http_timeout == 0 {
            return Err("http_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the provider credentials as a value object for the upload client.
    pub fn credentials(&self) -> CloudinaryCredentials {
        CloudinaryCredentials {
            cloud_name: self.cloud_name.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
