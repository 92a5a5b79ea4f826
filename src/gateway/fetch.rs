use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

/// Connect timeout for outbound requests, separate from the total timeout.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Trait for retrieving a source image by URL.
///
/// This abstraction keeps the request pipeline independent of the actual
/// transport, so tests can substitute an in-memory fake. Implementations
/// must be thread-safe and cloneable.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the resource at `url` and return its raw bytes.
    ///
    /// A single retrieval with no retry. Returns an error if the URL is
    /// invalid, the server is unreachable or times out, the response status
    /// is not 2xx, or the body cannot be read to completion.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// HTTP implementation of `ImageFetcher`.
///
/// Wraps a shared `reqwest::Client`; timeouts and the user agent are set at
/// client construction (see [`build_http_client`]).
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a new fetcher over the given client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(data)
    }
}

/// Build the HTTP client shared by the fetch and upload gateways.
///
/// `timeout_secs` bounds the whole request including the body read; the
/// connect timeout is fixed and shorter so dead hosts fail fast.
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("imgpress/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

// =============================================================================
// Tests
// =============================================================================
