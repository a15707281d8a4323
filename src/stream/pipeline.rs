//! Byte-stream pipeline: container header in, stretched container out.
//!
//! Strict forward-only composition of the four stages. Each `process` call
//! is synchronous and may produce zero or many output bytes; backpressure
//! and timeouts belong to whatever feeds and drains the pipeline.

use crate::core::types::StretchParams;
use crate::error::StretchError;
use crate::stretch::engine::Stretcher;
use crate::wav::header::{HeaderReader, HeaderWriter};
use crate::wav::pcm::PcmDecoder;
use crate::wav::HEADER_LEN;

/// Stages that exist only once the input header has been parsed.
struct ActiveStages {
    decoder: PcmDecoder,
    engine: Stretcher,
    writer: HeaderWriter,
    expand_mono: bool,
}

/// Streaming stretch conversion over raw container bytes.
///
/// Push input with [`process`](Self::process), then call
/// [`finish`](Self::finish) exactly once at end of input. Dropping the
/// pipeline mid-stream discards all state without side effects.
pub struct StretchPipeline {
    params: StretchParams,
    header: HeaderReader,
    stages: Option<ActiveStages>,
}

impl StretchPipeline {
    /// Creates a pipeline, validating the parameters eagerly.
    pub fn new(params: StretchParams) -> Result<Self, StretchError> {
        params.validate()?;
        Ok(Self {
            params,
            header: HeaderReader::new(),
            stages: None,
        })
    }

    /// Feeds raw input bytes and returns whatever output bytes result.
    ///
    /// Output is empty until the 44-byte input header has completed; the
    /// first non-empty result starts with the synthesized output header.
    pub fn process(&mut self, bytes: &[u8]) -> Result<Vec<u8>, StretchError> {
        let payload = self.header.push(bytes)?;

        if self.stages.is_none() {
            if let Some(&spec) = self.header.spec() {
                spec.validate()?;
                log::debug!(
                    "input stream: {} Hz, {} ch, {} bit",
                    spec.sample_rate,
                    spec.channels,
                    spec.bits_per_sample
                );

                let expand_mono = self.params.expand_mono && spec.channels == 1;
                let out_channels = if expand_mono { 2 } else { spec.channels };
                self.stages = Some(ActiveStages {
                    decoder: PcmDecoder::new(spec)?,
                    engine: Stretcher::new(&self.params, spec.sample_rate, out_channels as usize)?,
                    writer: HeaderWriter::new(spec.sample_rate, out_channels),
                    expand_mono,
                });
            }
        }

        let Some(stages) = self.stages.as_mut() else {
            return Ok(Vec::new());
        };

        let mut batch = stages.decoder.decode(&payload);
        if stages.expand_mono {
            batch.push(batch[0].clone());
        }
        let block = stages.engine.feed(&batch)?;
        // The writer emits the output header ahead of the first block; when
        // the engine has nothing yet we still force the header out so a
        // valid prefix exists as soon as the stream parameters are known.
        Ok(stages.writer.push(&block))
    }

    /// Flushes the engine and returns the final output bytes.
    ///
    /// # Errors
    /// Returns `StretchError::TruncatedHeader` if the input ended before
    /// the header completed; no partial output is valid in that case.
    pub fn finish(&mut self) -> Result<Vec<u8>, StretchError> {
        let Some(stages) = self.stages.as_mut() else {
            return Err(StretchError::TruncatedHeader {
                got: self.header.bytes_buffered(),
                needed: HEADER_LEN,
            });
        };

        let dangling = stages.decoder.pending_bytes();
        if dangling > 0 {
            log::warn!("input ended mid-frame; {} trailing bytes ignored", dangling);
        }

        let block = stages.engine.flush()?;
        Ok(stages.writer.push(&block))
    }

    /// The parameters this pipeline was built with.
    pub fn params(&self) -> &StretchParams {
        &self.params
    }
}
