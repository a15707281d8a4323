//! Streaming reader/writer for the fixed 44-byte uncompressed-PCM
//! container layout, plus the PCM sample codec.

pub mod header;
pub mod pcm;

pub use header::{encode_header, HeaderReader, HeaderWriter};
pub use pcm::{encode_frames, PcmDecoder};

/// Size of the fixed container header in bytes.
pub const HEADER_LEN: usize = 44;

/// PCM format tag written into the output header.
pub const FORMAT_PCM: u16 = 1;

/// Bit depth of all emitted output.
pub const OUTPUT_BITS: u16 = 16;
