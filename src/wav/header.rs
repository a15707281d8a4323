//! Streaming container header parsing and synthesis.
//!
//! The reader accumulates bytes until the fixed 44-byte header is complete,
//! extracts the stream parameters from their fixed offsets, and passes every
//! later byte through untouched (chunk extensions included — they are the
//! payload's problem, not re-validated here). The writer emits a header once
//! and then passes PCM blocks through. Because the stream length is unknown
//! while streaming, the file-size and data-size fields stay zero; they are
//! never retrofitted.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::types::StreamSpec;
use crate::error::StretchError;
use crate::wav::{FORMAT_PCM, HEADER_LEN, OUTPUT_BITS};

/// Byte offsets of the parsed header fields.
const OFFSET_CHANNELS: usize = 22;
const OFFSET_SAMPLE_RATE: usize = 24;
const OFFSET_BITS: usize = 34;

/// Accumulates bytes until the container header is complete, then becomes a
/// pass-through.
#[derive(Debug, Default)]
pub struct HeaderReader {
    pending: Vec<u8>,
    spec: Option<StreamSpec>,
}

impl HeaderReader {
    /// Creates a reader awaiting its header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds bytes in. Returns the bytes following the header, which is
    /// empty until the header has completed.
    ///
    /// # Errors
    /// Returns `StretchError::InvalidFormat` if the RIFF/WAVE tags are
    /// missing once 44 bytes are available.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<u8>, StretchError> {
        if self.spec.is_some() {
            return Ok(bytes.to_vec());
        }
        self.pending.extend_from_slice(bytes);
        if self.pending.len() < HEADER_LEN {
            return Ok(Vec::new());
        }

        if &self.pending[0..4] != b"RIFF" {
            return Err(StretchError::InvalidFormat("missing RIFF tag".to_string()));
        }
        if &self.pending[8..12] != b"WAVE" {
            return Err(StretchError::InvalidFormat("missing WAVE tag".to_string()));
        }

        let channels = LittleEndian::read_u16(&self.pending[OFFSET_CHANNELS..OFFSET_CHANNELS + 2]);
        let sample_rate =
            LittleEndian::read_u32(&self.pending[OFFSET_SAMPLE_RATE..OFFSET_SAMPLE_RATE + 4]);
        let bits = LittleEndian::read_u16(&self.pending[OFFSET_BITS..OFFSET_BITS + 2]);

        self.spec = Some(StreamSpec {
            sample_rate,
            channels,
            bits_per_sample: bits,
        });

        let payload = self.pending.split_off(HEADER_LEN);
        self.pending.clear();
        self.pending.shrink_to_fit();
        Ok(payload)
    }

    /// The parsed stream parameters, once the header has completed.
    pub fn spec(&self) -> Option<&StreamSpec> {
        self.spec.as_ref()
    }

    /// Number of header bytes received so far (for truncation reporting).
    pub fn bytes_buffered(&self) -> usize {
        if self.spec.is_some() {
            HEADER_LEN
        } else {
            self.pending.len()
        }
    }
}

/// Synthesizes the 44-byte output header for a 16-bit PCM stream.
///
/// File-size and data-size fields are zero placeholders.
pub fn encode_header(sample_rate: u32, channels: u16) -> [u8; HEADER_LEN] {
    let bytes_per_frame = channels as u32 * (OUTPUT_BITS as u32 / 8);
    let byte_rate = sample_rate * bytes_per_frame;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    // file size placeholder stays zero
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    LittleEndian::write_u32(&mut header[16..20], 16); // fmt chunk size
    LittleEndian::write_u16(&mut header[20..22], FORMAT_PCM);
    LittleEndian::write_u16(&mut header[22..24], channels);
    LittleEndian::write_u32(&mut header[24..28], sample_rate);
    LittleEndian::write_u32(&mut header[28..32], byte_rate);
    LittleEndian::write_u16(&mut header[32..34], bytes_per_frame as u16);
    LittleEndian::write_u16(&mut header[34..36], OUTPUT_BITS);
    header[36..40].copy_from_slice(b"data");
    // data size placeholder stays zero
    header
}

/// Emits the output header ahead of the first PCM block, then passes blocks
/// through unchanged.
#[derive(Debug)]
pub struct HeaderWriter {
    sample_rate: u32,
    channels: u16,
    written: bool,
}

impl HeaderWriter {
    /// Creates a writer for the given output parameters.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            written: false,
        }
    }

    /// Passes a PCM block through, prepending the header on first call.
    pub fn push(&mut self, block: &[u8]) -> Vec<u8> {
        if self.written {
            return block.to_vec();
        }
        self.written = true;
        let mut out = Vec::with_capacity(HEADER_LEN + block.len());
        out.extend_from_slice(&encode_header(self.sample_rate, self.channels));
        out.extend_from_slice(block);
        out
    }

    /// Whether the header has been emitted.
    pub fn header_written(&self) -> bool {
        self.written
    }
}
