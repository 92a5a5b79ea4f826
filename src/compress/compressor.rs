//! Size-constrained compression loop.
//!
//! The SizeBoundCompressor drives the JPEG encoder through a fixed
//! descending quality schedule until the output fits a byte budget.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   SizeBoundCompressor                      │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                     compress()                       │  │
//! │  │  quality = 90                                        │  │
//! │  │  while quality > 10:                                 │  │
//! │  │      candidate = encode(source, quality)             │  │
//! │  │      if len(candidate) <= target: return candidate   │  │
//! │  │      quality -= 10                                   │  │
//! │  │  return encode(source, 10)   # best effort           │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │           │                           │                    │
//! │           ▼                           ▼                    │
//! │  ┌────────────────────┐    ┌──────────────────────┐        │
//! │  │ JpegQualityEncoder │    │ CompressionObserver  │        │
//! │  └────────────────────┘    └──────────────────────┘        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Search policy
//!
//! The search is first-fit from the high-quality end: the first candidate
//! that fits wins, with no backtracking. Every attempt re-encodes the
//! ORIGINAL bytes, never a previous attempt's output, so quality loss does
//! not accumulate across iterations. When the schedule is exhausted the
//! floor-quality result is returned unconditionally, even if it still
//! exceeds the target.

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::error::EncodeError;

use super::encoder::JpegQualityEncoder;

/// Quality level the search starts at.
pub const INITIAL_QUALITY: u8 = 90;

/// Amount the quality drops between attempts.
pub const QUALITY_STEP: u8 = 10;

/// Quality floor. The loop body never runs at or below this level; the
/// single fallback encode happens exactly here.
pub const QUALITY_FLOOR: u8 = 10;

/// Default output size target in kilobytes.
pub const DEFAULT_TARGET_KB: u32 = 250;

// =============================================================================
// Observer
// =============================================================================

/// Hook for reporting compression progress.
///
/// The compressor calls `attempt` after every encoder invocation and
/// `fallback` when the quality schedule is exhausted and the floor-quality
/// result is about to be returned regardless of its size.
pub trait CompressionObserver: Send + Sync {
    /// An encoder invocation finished; `fits` is whether the candidate is
    /// within the target.
    fn attempt(&self, quality: u8, size_bytes: usize, fits: bool);

    /// The schedule ran out; the floor-quality result is returned as is.
    fn fallback(&self, quality: u8, size_bytes: usize, target_bytes: usize);
}

/// Production observer that reports through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl CompressionObserver for TracingObserver {
    fn attempt(&self, quality: u8, size_bytes: usize, fits: bool) {
        if fits {
            info!(
                quality = quality,
                size_kb = size_bytes / 1024,
                "Compression successful"
            );
        } else {
            debug!(
                quality = quality,
                size_kb = size_bytes / 1024,
                "Candidate over target, lowering quality"
            );
        }
    }

    fn fallback(&self, quality: u8, size_bytes: usize, target_bytes: usize) {
        warn!(
            quality = quality,
            size_kb = size_bytes / 1024,
            target_kb = target_bytes / 1024,
            "Could not reach size target, returning last attempt"
        );
    }
}

// =============================================================================
// Compression Outcome
// =============================================================================

/// Result of a compression run.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// The encoded JPEG data
    pub data: Bytes,

    /// The quality level the returned data was encoded at
    pub quality: u8,

    /// How many encoder invocations the search took
    pub attempts: u32,

    /// Whether the returned data fits the target. `false` only on the
    /// fallback path; the HTTP response never exposes this.
    pub within_target: bool,
}

// =============================================================================
// Size-Bound Compressor
// =============================================================================

/// Compressor that searches for the highest quality fitting a size budget.
///
/// Walks the quality schedule 90, 80, ... downward, re-encoding the source
/// at each step, and returns the first candidate whose byte length is at
/// most `target_kb * 1024`. If no candidate in the schedule fits, one final
/// encode at the floor quality is returned unconditionally.
///
/// # Example
///
/// ```ignore
/// use imgpress::compress::SizeBoundCompressor;
///
/// let compressor = SizeBoundCompressor::new(250);
/// let outcome = compressor.compress(&source_bytes)?;
///
/// println!("{} bytes at quality {}", outcome.data.len(), outcome.quality);
/// ```
pub struct SizeBoundCompressor {
    /// JPEG encoder
    encoder: JpegQualityEncoder,

    /// Output size target in kilobytes
    target_kb: u32,

    /// Progress reporting hook
    observer: Box<dyn CompressionObserver>,
}

impl SizeBoundCompressor {
    /// Create a compressor with the given size target, reporting through
    /// `tracing`.
    pub fn new(target_kb: u32) -> Self {
        Self::with_observer(target_kb, Box::new(TracingObserver))
    }

    /// Create a compressor with a custom observer.
    pub fn with_observer(target_kb: u32, observer: Box<dyn CompressionObserver>) -> Self {
        Self {
            encoder: JpegQualityEncoder::new(),
            target_kb,
            observer,
        }
    }

    /// The configured size target in kilobytes.
    pub fn target_kb(&self) -> u32 {
        self.target_kb
    }

    /// Compress the source under the size target if possible.
    ///
    /// Always re-encodes at least once, even when the source is already
    /// under the target. Worst case is 9 encoder invocations (90 down to
    /// 20 in the loop, then the floor).
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be decoded or a JPEG encode
    /// fails. Encoder errors are terminal; the search never retries a
    /// failed quality level.
    pub fn compress(&self, source: &[u8]) -> Result<CompressionOutcome, EncodeError> {
        let target_bytes = self.target_kb as usize * 1024;
        let mut quality = INITIAL_QUALITY;
        let mut attempts = 0u32;

        while quality > QUALITY_FLOOR {
            let candidate = self.encoder.encode(source, quality)?;
            attempts += 1;

            let fits = candidate.len() <= target_bytes;
            self.observer.attempt(quality, candidate.len(), fits);

            if fits {
                return Ok(CompressionOutcome {
                    data: candidate,
                    quality,
                    attempts,
                    within_target: true,
                });
            }

            quality -= QUALITY_STEP;
        }

        // Schedule exhausted: one final encode at the floor, returned even
        // when it is still over the target.
        let last = self.encoder.encode(source, quality)?;
        attempts += 1;

        let fits = last.len() <= target_bytes;
        self.observer.attempt(quality, last.len(), fits);
        self.observer.fallback(quality, last.len(), target_bytes);

        Ok(CompressionOutcome {
            data: last,
            quality,
            attempts,
            within_target: fits,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
