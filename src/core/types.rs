//! Stream parameters and stretch configuration.

use crate::error::StretchError;

/// A single audio sample (32-bit float, range -1.0 to 1.0).
pub type Sample = f32;

/// Parameters of an uncompressed PCM stream, extracted once from the
/// container header and immutable for the lifetime of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Bits per integer sample (16 or 32).
    pub bits_per_sample: u16,
}

impl StreamSpec {
    /// Creates a validated stream spec.
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Result<Self, StretchError> {
        let spec = Self {
            sample_rate,
            channels,
            bits_per_sample,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Validates sample rate, channel count, and bit depth.
    pub fn validate(&self) -> Result<(), StretchError> {
        if self.sample_rate == 0 {
            return Err(StretchError::InvalidSampleRate(self.sample_rate));
        }
        if self.channels == 0 {
            return Err(StretchError::InvalidChannels(self.channels));
        }
        if self.bits_per_sample != 16 && self.bits_per_sample != 32 {
            return Err(StretchError::UnsupportedBitDepth(self.bits_per_sample));
        }
        Ok(())
    }

    /// Bytes per single-channel sample.
    #[inline]
    pub fn bytes_per_sample(&self) -> usize {
        self.bits_per_sample as usize / 8
    }

    /// Bytes per interleaved frame (all channels).
    #[inline]
    pub fn bytes_per_frame(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }
}

/// Parameters controlling a stretch conversion.
#[derive(Debug, Clone)]
pub struct StretchParams {
    /// Stretch factor: 8.0 stretches one second of input into roughly
    /// eight seconds of output. Must be positive and finite.
    pub stretch_factor: f64,
    /// Analysis window length in seconds (default: 0.25).
    pub window_secs: f64,
    /// Onset sensitivity (default: 10.0). Accepted for compatibility with
    /// the classic parameter set; nothing currently feeds the onset credit
    /// accumulator, so this value does not affect output.
    pub onset_level: f64,
    /// Duplicate a mono source into two identical channels (default: true).
    pub expand_mono: bool,
    /// Seed for the phase randomizer. `None` seeds from the OS; a fixed
    /// seed makes output reproducible.
    pub seed: Option<u64>,
}

impl StretchParams {
    /// Creates parameters with the given stretch factor.
    ///
    /// # Errors
    /// Returns `StretchError::InvalidStretchFactor` if the factor is not
    /// positive and finite.
    pub fn new(stretch_factor: f64) -> Result<Self, StretchError> {
        if !stretch_factor.is_finite() || stretch_factor <= 0.0 {
            return Err(StretchError::InvalidStretchFactor(stretch_factor));
        }
        Ok(Self {
            stretch_factor,
            window_secs: 0.25,
            onset_level: 10.0,
            expand_mono: true,
            seed: None,
        })
    }

    /// Sets the analysis window length in seconds.
    pub fn with_window_secs(mut self, window_secs: f64) -> Self {
        self.window_secs = window_secs;
        self
    }

    /// Sets the onset sensitivity.
    pub fn with_onset_level(mut self, onset_level: f64) -> Self {
        self.onset_level = onset_level;
        self
    }

    /// Enables or disables mono-to-stereo duplication.
    pub fn with_mono_expansion(mut self, expand_mono: bool) -> Self {
        self.expand_mono = expand_mono;
        self
    }

    /// Fixes the phase randomizer seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates all parameters.
    pub fn validate(&self) -> Result<(), StretchError> {
        if !self.stretch_factor.is_finite() || self.stretch_factor <= 0.0 {
            return Err(StretchError::InvalidStretchFactor(self.stretch_factor));
        }
        if !self.window_secs.is_finite() || self.window_secs <= 0.0 {
            return Err(StretchError::InvalidWindowSecs(self.window_secs));
        }
        Ok(())
    }
}
