#![forbid(unsafe_code)]
//! Streaming extreme time stretching (Paulstretch) for uncompressed PCM audio.
//!
//! `paulstretch` stretches the duration of an audio stream by an arbitrary
//! factor while preserving its spectral envelope, producing the
//! characteristic smeared, ambient texture of the classic algorithm:
//! overlapping Hann-windowed FFT frames, magnitude interpolation across the
//! hop, uniformly random phase, and overlap-add reconstruction. The whole
//! pipeline is push-based and runs in bounded memory on inputs of unbounded
//! length.
//!
//! Input and output use the fixed 44-byte uncompressed-PCM container layout
//! (16- or 32-bit integer input, always 16-bit output with zero size
//! placeholders, since the stream length is unknown while streaming).
//!
//! # Quick start
//!
//! ```
//! use paulstretch::{StretchParams, StretchPipeline};
//!
//! // Half a second of 16-bit mono silence behind a standard header.
//! let mut wav = paulstretch::wav::encode_header(44100, 1).to_vec();
//! wav.extend(std::iter::repeat(0u8).take(22050 * 2));
//!
//! let params = StretchParams::new(8.0)
//!     .unwrap()
//!     .with_window_secs(0.05)
//!     .with_seed(1);
//! let mut pipeline = StretchPipeline::new(params).unwrap();
//!
//! let mut out = pipeline.process(&wav).unwrap();
//! out.extend(pipeline.finish().unwrap());
//! assert!(out.len() > wav.len()); // ~8x the duration
//! ```
//!
//! For chunked input, call [`StretchPipeline::process`] per chunk; output
//! is byte-identical however the input is sliced (given a fixed seed).

pub mod core;
pub mod error;
pub mod stream;
pub mod stretch;
pub mod wav;

pub use crate::core::types::{Sample, StreamSpec, StretchParams};
pub use crate::core::window::{optimize_window_size, AnalysisWindow};
pub use crate::error::StretchError;
pub use crate::stream::pipeline::StretchPipeline;
pub use crate::stretch::engine::Stretcher;

/// Stretches a complete in-memory container byte stream.
///
/// Convenience wrapper over [`StretchPipeline`] for callers that already
/// hold the whole input; streaming callers should drive the pipeline
/// directly.
///
/// # Errors
/// Propagates configuration and format errors from the pipeline; a buffer
/// shorter than the 44-byte header yields
/// [`StretchError::TruncatedHeader`].
pub fn stretch_wav(input: &[u8], params: &StretchParams) -> Result<Vec<u8>, StretchError> {
    let mut pipeline = StretchPipeline::new(params.clone())?;
    let mut out = pipeline.process(input)?;
    out.extend(pipeline.finish()?);
    Ok(out)
}
