//! PCM sample codec: interleaved integer bytes to normalized per-channel
//! floats and back.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::types::{Sample, StreamSpec};
use crate::error::StretchError;

/// Streaming decoder for interleaved 16/32-bit signed PCM.
///
/// Partial trailing frames are carried across chunk boundaries, so no sample
/// is dropped or duplicated however the input is sliced.
#[derive(Debug)]
pub struct PcmDecoder {
    spec: StreamSpec,
    pending: Vec<u8>,
}

impl PcmDecoder {
    /// Creates a decoder for the given stream parameters.
    ///
    /// # Errors
    /// Returns `StretchError::UnsupportedBitDepth` for depths other than
    /// 16 or 32, and the spec's own errors for zero rates or channels.
    pub fn new(spec: StreamSpec) -> Result<Self, StretchError> {
        spec.validate()?;
        Ok(Self {
            spec,
            pending: Vec::new(),
        })
    }

    /// Decodes a chunk into one float sequence per channel, all of equal
    /// length. Returns empty sequences while less than one whole frame is
    /// buffered.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<Vec<Sample>> {
        self.pending.extend_from_slice(bytes);

        let frame_len = self.spec.bytes_per_frame();
        let channels = self.spec.channels as usize;
        let num_frames = self.pending.len() / frame_len;
        let mut out: Vec<Vec<Sample>> = (0..channels)
            .map(|_| Vec::with_capacity(num_frames))
            .collect();
        if num_frames == 0 {
            return out;
        }

        // Normalize by the bit depth's maximum magnitude.
        let scale = 1.0 / (1u64 << (self.spec.bits_per_sample - 1)) as f32;
        let bytes_per_sample = self.spec.bytes_per_sample();
        let consumed = num_frames * frame_len;

        for frame in self.pending[..consumed].chunks_exact(frame_len) {
            for (ch, slot) in out.iter_mut().enumerate() {
                let at = ch * bytes_per_sample;
                let raw = match self.spec.bits_per_sample {
                    16 => LittleEndian::read_i16(&frame[at..at + 2]) as f32,
                    _ => LittleEndian::read_i32(&frame[at..at + 4]) as f32,
                };
                slot.push(raw * scale);
            }
        }

        self.pending.drain(..consumed);
        out
    }

    /// Bytes of an incomplete trailing frame still buffered.
    pub fn pending_bytes(&self) -> usize {
        self.pending.len()
    }

    /// The stream parameters this decoder was built for.
    pub fn spec(&self) -> &StreamSpec {
        &self.spec
    }
}

/// Encodes equal-length per-channel float blocks into interleaved
/// little-endian 16-bit PCM, clamping to [-1, 1] before scaling.
pub fn encode_frames(channels: &[Vec<Sample>]) -> Vec<u8> {
    let num_frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = vec![0u8; num_frames * channels.len() * 2];
    let mut at = 0;
    for i in 0..num_frames {
        for ch in channels {
            let clamped = ch[i].clamp(-1.0, 1.0);
            let raw = (clamped * 32767.0).round() as i16;
            LittleEndian::write_i16(&mut out[at..at + 2], raw);
            at += 2;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(channels: u16, bits: u16) -> StreamSpec {
        StreamSpec::new(44100, channels, bits).unwrap()
    }

    #[test]
    fn test_decode_16bit_stereo() {
        let mut dec = PcmDecoder::new(spec(2, 16)).unwrap();
        // L = 16384 (0.5), R = -16384 (-0.5)
        let bytes = [0x00, 0x40, 0x00, 0xC0];
        let out = dec.decode(&bytes);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], vec![0.5]);
        assert_eq!(out[1], vec![-0.5]);
        assert_eq!(dec.pending_bytes(), 0);
    }

    #[test]
    fn test_decode_32bit() {
        let mut dec = PcmDecoder::new(spec(1, 32)).unwrap();
        let raw: i32 = 1 << 30; // 0.5 after normalization by 2^31
        let bytes = raw.to_le_bytes();
        let out = dec.decode(&bytes);
        assert_eq!(out[0], vec![0.5]);
    }

    #[test]
    fn test_partial_frame_carry() {
        let mut dec = PcmDecoder::new(spec(2, 16)).unwrap();
        let frame = [0x00, 0x40, 0x00, 0xC0];
        // Split mid-frame at an odd offset.
        let out = dec.decode(&frame[..3]);
        assert!(out[0].is_empty());
        assert_eq!(dec.pending_bytes(), 3);

        let out = dec.decode(&frame[3..]);
        assert_eq!(out[0], vec![0.5]);
        assert_eq!(out[1], vec![-0.5]);
        assert_eq!(dec.pending_bytes(), 0);
    }

    #[test]
    fn test_unsupported_depth_rejected() {
        let spec = StreamSpec {
            sample_rate: 44100,
            channels: 1,
            bits_per_sample: 24,
        };
        assert!(matches!(
            PcmDecoder::new(spec),
            Err(StretchError::UnsupportedBitDepth(24))
        ));
    }

    #[test]
    fn test_encode_interleaves_and_clamps() {
        let left = vec![0.5, 2.0];
        let right = vec![-0.5, -2.0];
        let bytes = encode_frames(&[left, right]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(LittleEndian::read_i16(&bytes[0..2]), 16384);
        assert_eq!(LittleEndian::read_i16(&bytes[2..4]), -16384);
        // Out-of-range values clamp to full scale.
        assert_eq!(LittleEndian::read_i16(&bytes[4..6]), 32767);
        assert_eq!(LittleEndian::read_i16(&bytes[6..8]), -32767);
    }

    #[test]
    fn test_roundtrip_within_quantization_error() {
        let values = vec![0.0, 0.25, -0.25, 0.5, -0.5, 0.75, -0.875, 0.875];
        let bytes = encode_frames(&[values.clone()]);
        let mut dec = PcmDecoder::new(spec(1, 16)).unwrap();
        let decoded = dec.decode(&bytes);
        for (orig, got) in values.iter().zip(decoded[0].iter()) {
            assert!(
                (orig - got).abs() <= 1.0 / 32768.0,
                "roundtrip error too large: {} vs {}",
                orig,
                got
            );
        }
    }

    #[test]
    fn test_decode_byte_at_a_time_loses_nothing() {
        let frames = encode_frames(&[vec![0.1, -0.2, 0.3], vec![0.4, -0.5, 0.6]]);
        let mut whole = PcmDecoder::new(spec(2, 16)).unwrap();
        let expect = whole.decode(&frames);

        let mut trickle = PcmDecoder::new(spec(2, 16)).unwrap();
        let mut got: Vec<Vec<Sample>> = vec![Vec::new(), Vec::new()];
        for byte in &frames {
            let part = trickle.decode(std::slice::from_ref(byte));
            for (acc, ch) in got.iter_mut().zip(part) {
                acc.extend(ch);
            }
        }
        assert_eq!(expect, got);
    }
}
