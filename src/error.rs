//! Error types for the paulstretch crate.

use std::fmt;

/// Errors that can occur while configuring or running a stretch conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum StretchError {
    /// Stretch factor must be positive and finite.
    InvalidStretchFactor(f64),
    /// Window length in seconds must be positive and finite.
    InvalidWindowSecs(f64),
    /// Sample rate must be greater than zero.
    InvalidSampleRate(u32),
    /// Channel count must be greater than zero.
    InvalidChannels(u16),
    /// Only 16-bit and 32-bit integer PCM input is supported.
    UnsupportedBitDepth(u16),
    /// Malformed container data.
    InvalidFormat(String),
    /// Input ended before the fixed-size container header completed.
    TruncatedHeader { got: usize, needed: usize },
    /// I/O error.
    IoError(String),
}

impl fmt::Display for StretchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StretchError::InvalidStretchFactor(v) => {
                write!(f, "invalid stretch factor: {}. Must be positive and finite.", v)
            }
            StretchError::InvalidWindowSecs(v) => {
                write!(f, "invalid window length: {} s. Must be positive and finite.", v)
            }
            StretchError::InvalidSampleRate(sr) => {
                write!(f, "invalid sample rate: {}. Must be greater than 0.", sr)
            }
            StretchError::InvalidChannels(c) => {
                write!(f, "invalid channel count: {}. Must be greater than 0.", c)
            }
            StretchError::UnsupportedBitDepth(bits) => {
                write!(f, "unsupported bit depth: {}. Only 16 and 32 bit PCM.", bits)
            }
            StretchError::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
            StretchError::TruncatedHeader { got, needed } => {
                write!(f, "truncated header: {} bytes received, {} required", got, needed)
            }
            StretchError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StretchError {}

impl From<std::io::Error> for StretchError {
    fn from(err: std::io::Error) -> Self {
        StretchError::IoError(err.to_string())
    }
}
