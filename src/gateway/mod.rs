//! Outbound gateway layer.
//!
//! This module owns both sides of the service's outbound traffic: pulling
//! source images from arbitrary URLs and pushing compressed results to the
//! asset host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └──────────┬───────────────────┬──────────┘
//!            │                   │
//!            ▼                   ▼
//! ┌─────────────────┐   ┌──────────────────┐
//! │  ImageFetcher   │   │    AssetHost     │
//! │     trait       │   │      trait       │
//! └────────┬────────┘   └────────┬─────────┘
//!          │                     │
//!          ▼                     ▼
//! ┌─────────────────┐   ┌──────────────────┐
//! │ HttpImageFetcher│   │ CloudinaryClient │
//! │   (reqwest)     │   │ (signed upload)  │
//! └─────────────────┘   └──────────────────┘
//! ```
//!
//! Both sides share one `reqwest::Client` built by [`build_http_client`];
//! the traits exist so the HTTP handlers can be tested against in-memory
//! fakes.

mod fetch;
mod upload;

pub use fetch::{build_http_client, HttpImageFetcher, ImageFetcher};
pub use upload::{
    compute_signature, signature_base, AssetHost, CloudinaryClient, CloudinaryCredentials,
    UploadResult, DEFAULT_API_BASE,
};
