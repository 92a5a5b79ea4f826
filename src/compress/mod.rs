//! Size-constrained compression layer.
//!
//! This module turns arbitrary source images into JPEGs that fit a byte
//! budget, by searching downward over the encoder quality parameter.
//!
//! # Architecture
//!
//! The compressor sits between the HTTP layer and the codec:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          SizeBoundCompressor            │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │   quality    │  │  JPEG Encoder   │  │
//! │  │   schedule   │  │  (decode →      │  │
//! │  │  90,80,…,10  │  │   encode)       │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`SizeBoundCompressor`]: first-fit descending-quality search over the encoder
//! - [`JpegQualityEncoder`]: decodes any supported source format, re-encodes as JPEG
//! - [`CompressionOutcome`]: chosen bytes plus quality, attempt count, and target fit
//! - [`CompressionObserver`]: injectable progress hook; [`TracingObserver`] in production

mod compressor;
mod encoder;

pub use compressor::{
    CompressionObserver, CompressionOutcome, SizeBoundCompressor, TracingObserver,
    DEFAULT_TARGET_KB, INITIAL_QUALITY, QUALITY_FLOOR, QUALITY_STEP,
};
pub use encoder::{clamp_quality, JpegQualityEncoder, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY};
