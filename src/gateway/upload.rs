//! Cloudinary upload gateway.
//!
//! This module implements the signed upload protocol of the Cloudinary API
//! behind the `AssetHost` trait.
//!
//! # Upload Signing Scheme
//!
//! Each upload request carries a signature over its parameters:
//!
//! ```text
//! signature = SHA-1("{canonical_params}{api_secret}")
//! ```
//!
//! where `canonical_params` is every parameter except `file`, `api_key` and
//! the signature itself, sorted by name and joined `key=value` with `&`.
//! For this service that is always:
//!
//! ```text
//! folder={folder}&timestamp={unix_seconds}
//! ```
//!
//! The signed request is a multipart form POST to
//! `{api_base}/v1_1/{cloud_name}/image/upload` with parts `file`,
//! `api_key`, `timestamp`, `signature` and `folder`.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::error::UploadError;

/// Default Cloudinary API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

// =============================================================================
// Types
// =============================================================================

/// A successfully hosted asset.
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Publicly resolvable HTTPS URL of the hosted asset
    pub secure_url: String,

    /// Provider-assigned asset identifier
    pub public_id: String,
}

/// Cloudinary account credentials.
#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    /// Account identifier (the `cloud_name` in API URLs)
    pub cloud_name: String,

    /// API access key
    pub api_key: String,

    /// API secret used for request signing
    pub api_secret: String,
}

/// Upload response body (2xx).
#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    secure_url: String,
    public_id: String,
}

/// Error response body (non-2xx): `{"error":{"message":...}}`.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

// =============================================================================
// Asset Host Trait
// =============================================================================

/// Trait for publishing compressed images to an asset host.
///
/// Like the fetch side, this is a seam for tests: the request pipeline only
/// sees the trait. Implementations must be thread-safe and cloneable.
#[async_trait]
pub trait AssetHost: Send + Sync {
    /// Upload `data` under the given logical folder and return the hosted
    /// asset's public URL and id.
    ///
    /// A single attempt with no retry. Fails on transport errors, on any
    /// provider-side rejection, and on responses that cannot be
    /// interpreted.
    async fn upload(&self, data: Bytes, folder: &str) -> Result<UploadResult, UploadError>;
}

// =============================================================================
// Cloudinary Client
// =============================================================================

/// Cloudinary implementation of `AssetHost`.
///
/// # Example
///
/// ```ignore
/// use imgpress::gateway::{AssetHost, CloudinaryClient, CloudinaryCredentials};
///
/// let credentials = CloudinaryCredentials {
///     cloud_name: "demo".to_string(),
///     api_key: "key".to_string(),
///     api_secret: "secret".to_string(),
/// };
/// let cloudinary = CloudinaryClient::new(http_client, credentials);
///
/// let result = cloudinary.upload(jpeg_bytes, "compressed-images").await?;
/// println!("hosted at {}", result.secure_url);
/// ```
#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    credentials: CloudinaryCredentials,
    api_base: String,
}

impl CloudinaryClient {
    /// Create a client against the public Cloudinary endpoint.
    pub fn new(client: Client, credentials: CloudinaryCredentials) -> Self {
        Self::with_api_base(client, credentials, DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base URL.
    ///
    /// Used by the integration tests to point the client at a local stub
    /// server.
    pub fn with_api_base(
        client: Client,
        credentials: CloudinaryCredentials,
        api_base: impl Into<String>,
    ) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client,
            credentials,
            api_base,
        }
    }

    /// The account identifier this client uploads to.
    pub fn cloud_name(&self) -> &str {
        &self.credentials.cloud_name
    }

    /// The image upload endpoint for this account.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base, self.credentials.cloud_name
        )
    }

    /// The Admin API ping endpoint for this account.
    pub fn ping_url(&self) -> String {
        format!("{}/v1_1/{}/ping", self.api_base, self.credentials.cloud_name)
    }

    /// Verify credentials and reachability via the Admin API ping.
    ///
    /// Called once at startup so a misconfigured account fails fast instead
    /// of on the first upload.
    pub async fn ping(&self) -> Result<(), UploadError> {
        let response = self
            .client
            .get(self.ping_url())
            .basic_auth(
                &self.credentials.api_key,
                Some(&self.credentials.api_secret),
            )
            .send()
            .await
            .map_err(|e| UploadError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl AssetHost for CloudinaryClient {
    async fn upload(&self, data: Bytes, folder: &str) -> Result<UploadResult, UploadError> {
        let timestamp = unix_timestamp();
        let timestamp_str = timestamp.to_string();
        let signature = compute_signature(
            &[("folder", folder), ("timestamp", &timestamp_str)],
            &self.credentials.api_secret,
        );

        debug!(
            folder = folder,
            bytes = data.len(),
            "Uploading image to Cloudinary"
        );

        let form = Form::new()
            .part(
                "file",
                Part::bytes(data.to_vec()).file_name("image.jpg".to_string()),
            )
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp_str)
            .text("signature", signature)
            .text("folder", folder.to_string());

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // Cloudinary error bodies are {"error":{"message":...}}; fall
            // back to the raw text for anything else
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponseBody =
            response
                .json()
                .await
                .map_err(|e| UploadError::InvalidResponse {
                    message: e.to_string(),
                })?;

        Ok(UploadResult {
            secure_url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

// =============================================================================
// Signing
// =============================================================================

/// Canonical parameter string the provider signs: parameters sorted by
/// name, joined `key=value` with `&`.
pub fn signature_base(params: &[(&str, &str)]) -> String {
    let mut pairs = params.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the hex-encoded SHA-1 upload signature over `params` with the
/// account secret appended.
pub fn compute_signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(signature_base(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// =============================================================================
// Tests
// =============================================================================
