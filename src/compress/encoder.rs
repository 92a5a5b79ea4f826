//! JPEG re-encoder with caller-controlled quality.
//!
//! This module handles decoding source images and re-encoding them as JPEG
//! at a specified quality level.
//!
//! # Design Decisions
//!
//! - **Always decode/encode**: Sources are always decoded to pixels and
//!   re-encoded as JPEG, even when the input is already a JPEG. No
//!   passthrough optimization.
//!
//! - **Format sniffing**: The source format (JPEG, PNG, WebP, GIF) is
//!   detected from the bytes themselves, never from a declared content type.
//!
//! - **JPEG out, always**: Whatever the input format, the output is JPEG.
//!   Quality is the only tunable; images are never resized.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;
use std::io::Cursor;

use crate::error::EncodeError;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// JPEG Encoder
// =============================================================================

/// Encoder that decodes arbitrary source images and re-encodes them as JPEG.
///
/// The output is deterministic for a fixed (input, quality) pair: encoding
/// the same bytes at the same quality always yields the same bytes.
///
/// # Example
///
/// ```ignore
/// use imgpress::compress::JpegQualityEncoder;
///
/// let encoder = JpegQualityEncoder::new();
///
/// // Source bytes in any supported format
/// let source: Vec<u8> = /* ... */;
///
/// // Re-encode as JPEG at quality 85
/// let output = encoder.encode(&source, 85)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct JpegQualityEncoder {
    // Currently stateless, but struct allows future extension
    // (e.g., shared thread pool, encoder settings)
}

impl JpegQualityEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Decode the source image and re-encode it as JPEG at the given quality.
    ///
    /// # Arguments
    ///
    /// * `source` - Encoded image bytes in any supported format
    /// * `quality` - Output JPEG quality (1-100; out-of-range values are clamped)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source bytes are not a decodable image
    /// - JPEG encoding fails
    pub fn encode(&self, source: &[u8], quality: u8) -> Result<Bytes, EncodeError> {
        let quality = clamp_quality(quality);

        // Sniff the format from the bytes, then decode
        let reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| EncodeError::Decode {
                message: e.to_string(),
            })?;

        let img = reader.decode().map_err(|e| EncodeError::Decode {
            message: e.to_string(),
        })?;

        // Encode to JPEG at the requested quality
        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);

        encoder
            .encode_image(&img)
            .map_err(|e| EncodeError::Encode {
                quality,
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Clamp quality to the valid JPEG range.
///
/// Values below 1 become 1, values above 100 become 100.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
