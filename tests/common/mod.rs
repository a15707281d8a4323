#![allow(dead_code)]

use std::f32::consts::PI;

use byteorder::{ByteOrder, LittleEndian};
use paulstretch::wav::{encode_header, HEADER_LEN};

/// Builds a complete in-memory container: 44-byte header plus interleaved
/// 16-bit PCM for the given per-channel float samples.
pub fn make_wav(sample_rate: u32, channels: &[Vec<f32>]) -> Vec<u8> {
    let num_frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = encode_header(sample_rate, channels.len() as u16).to_vec();
    for i in 0..num_frames {
        for ch in channels {
            let raw = (ch[i].clamp(-1.0, 1.0) * 32767.0).round() as i16;
            out.extend_from_slice(&raw.to_le_bytes());
        }
    }
    out
}

/// Patches the bit-depth field of a container header in place.
pub fn set_bit_depth(wav: &mut [u8], bits: u16) {
    LittleEndian::write_u16(&mut wav[34..36], bits);
}

/// Output frames per channel in a finished stream.
pub fn payload_frames(out: &[u8], channels: usize) -> usize {
    (out.len() - HEADER_LEN) / (2 * channels)
}

/// Channel count recorded in a container header.
pub fn header_channels(out: &[u8]) -> u16 {
    LittleEndian::read_u16(&out[22..24])
}

/// Sample rate recorded in a container header.
pub fn header_sample_rate(out: &[u8]) -> u32 {
    LittleEndian::read_u32(&out[24..28])
}

pub fn gen_sine(freq_hz: f32, sample_rate: u32, n: usize, amp: f32) -> Vec<f32> {
    (0..n)
        .map(|i| amp * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

pub fn gen_impulse(n: usize, at: usize, amp: f32) -> Vec<f32> {
    let mut out = vec![0.0f32; n];
    if at < n {
        out[at] = amp;
    }
    out
}
