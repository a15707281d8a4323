//! The windowed-FFT stretch engine.
//!
//! Extreme time stretching in the Paulstretch manner: analysis frames are
//! pulled from a sample history at half-window hops, their magnitude spectra
//! are interpolated across the hop and re-synthesized with uniformly random
//! phase, and successive synthesis windows are overlap-added into fixed-size
//! output blocks. Randomizing phase while preserving magnitude is what
//! produces the smeared, granular texture; interpolating magnitude across
//! the hop keeps the spectrum from clicking between frames.

use std::f32::consts::PI;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::core::buffer::SampleQueue;
use crate::core::types::{Sample, StretchParams};
use crate::core::window::AnalysisWindow;
use crate::error::StretchError;
use crate::wav::pcm::encode_frames;

const TWO_PI: f32 = 2.0 * PI;

/// Streaming stretch engine. One instance per conversion; all state is
/// owned here and mutated only by `feed`/`flush` on a single thread.
pub struct Stretcher {
    window: AnalysisWindow,
    channels: usize,
    /// Per-channel input sample history.
    history: Vec<SampleQueue>,
    /// Current magnitude frame, `half_size + 1` bins per channel.
    freqs: Vec<Vec<f32>>,
    /// Previous magnitude frame, blended against `freqs` each step.
    old_freqs: Vec<Vec<f32>>,
    /// Second half of the previous synthesis window, pending overlap-add.
    carry: Vec<Vec<f32>>,
    /// Reused per-channel output block of `half_size` samples.
    block: Vec<Vec<f32>>,
    /// Scratch for one analysis frame.
    frame: Vec<Sample>,
    fft_buffer: Vec<Complex<f32>>,
    fft_forward: Arc<dyn Fft<f32>>,
    fft_inverse: Arc<dyn Fft<f32>>,
    /// Fractional blend position between the previous and current frame.
    displace_tick: f64,
    /// Per-step tick advance, `min(1, 1/stretch_factor)`.
    tick_increase: f64,
    /// Pacing credit that slows tick advancement while positive. Nothing
    /// feeds it yet: the classic onset detector is not implemented, so the
    /// accumulator stays at zero and `onset_level` has no effect.
    extra_onset_credit: f64,
    /// Whether the next step must pull a fresh analysis frame.
    get_next_buf: bool,
    rng: SmallRng,
    seed: Option<u64>,
    /// Set once `flush` is called; enables tail padding.
    input_done: bool,
    /// Real (non-padding) samples still to be analyzed while draining.
    tail_remaining: usize,
}

impl Stretcher {
    /// Creates an engine for the given parameters and stream geometry.
    ///
    /// # Errors
    /// Fails fast on a non-positive stretch factor or window length, or a
    /// zero channel count, before any processing begins.
    pub fn new(
        params: &StretchParams,
        sample_rate: u32,
        channels: usize,
    ) -> Result<Self, StretchError> {
        params.validate()?;
        if sample_rate == 0 {
            return Err(StretchError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(StretchError::InvalidChannels(0));
        }

        let window = AnalysisWindow::new(sample_rate, params.window_secs);
        log::debug!(
            "stretch engine: window {} samples ({} per block), factor {}",
            window.size,
            window.half_size,
            params.stretch_factor
        );

        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(window.size);
        let fft_inverse = planner.plan_fft_inverse(window.size);

        let num_bins = window.half_size + 1;
        let half = window.half_size;
        let size = window.size;

        Ok(Self {
            channels,
            history: (0..channels).map(|_| SampleQueue::new()).collect(),
            freqs: vec![vec![0.0; num_bins]; channels],
            old_freqs: vec![vec![0.0; num_bins]; channels],
            carry: vec![vec![0.0; half]; channels],
            block: vec![vec![0.0; half]; channels],
            frame: vec![0.0; size],
            fft_buffer: vec![Complex::new(0.0, 0.0); size],
            fft_forward,
            fft_inverse,
            displace_tick: 0.0,
            tick_increase: (1.0 / params.stretch_factor).min(1.0),
            extra_onset_credit: 0.0,
            get_next_buf: true,
            rng: Self::make_rng(params.seed),
            seed: params.seed,
            input_done: false,
            tail_remaining: 0,
            window,
        })
    }

    fn make_rng(seed: Option<u64>) -> SmallRng {
        match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Window size in samples (even, at least 16).
    pub fn window_size(&self) -> usize {
        self.window.size
    }

    /// Frames per channel in each emitted output block.
    pub fn block_frames(&self) -> usize {
        self.window.half_size
    }

    /// Number of output channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples currently buffered per channel.
    pub fn buffered(&self) -> usize {
        self.history[0].len()
    }

    /// Appends one batch of per-channel samples and emits every output
    /// block that becomes possible. A single batch may yield zero, one, or
    /// many interleaved 16-bit PCM blocks.
    ///
    /// # Errors
    /// Returns `StretchError::InvalidFormat` if the batch's channel count
    /// or per-channel lengths disagree with the engine's geometry.
    pub fn feed(&mut self, batch: &[Vec<Sample>]) -> Result<Vec<u8>, StretchError> {
        if batch.len() != self.channels {
            return Err(StretchError::InvalidFormat(format!(
                "batch has {} channels, engine expects {}",
                batch.len(),
                self.channels
            )));
        }
        if batch.iter().any(|ch| ch.len() != batch[0].len()) {
            return Err(StretchError::InvalidFormat(
                "batch channels have unequal lengths".to_string(),
            ));
        }
        for (queue, samples) in self.history.iter_mut().zip(batch) {
            queue.push_slice(samples);
        }
        let mut out = Vec::new();
        self.run(&mut out);
        Ok(out)
    }

    /// Drains the engine at end of input. The buffered tail is zero-padded
    /// so the final partial windows are analyzed like any other; stepping
    /// stops once every real input sample has been consumed.
    pub fn flush(&mut self) -> Result<Vec<u8>, StretchError> {
        if !self.input_done {
            self.input_done = true;
            self.tail_remaining = self.history[0].len();
        }
        let mut out = Vec::new();
        self.run(&mut out);
        Ok(out)
    }

    /// Restores the just-constructed state, re-seeding the randomizer.
    pub fn reset(&mut self) {
        for queue in &mut self.history {
            queue.clear();
        }
        for frame in self.freqs.iter_mut().chain(self.old_freqs.iter_mut()) {
            frame.iter_mut().for_each(|m| *m = 0.0);
        }
        for carry in &mut self.carry {
            carry.iter_mut().for_each(|s| *s = 0.0);
        }
        self.displace_tick = 0.0;
        self.extra_onset_credit = 0.0;
        self.get_next_buf = true;
        self.input_done = false;
        self.tail_remaining = 0;
        self.rng = Self::make_rng(self.seed);
    }

    /// Steps while a step is possible. A step that must pull a fresh frame
    /// needs a full window of history (or, while draining, real tail
    /// samples left to pad out); a step reusing the current frame always
    /// may run.
    fn run(&mut self, out: &mut Vec<u8>) {
        loop {
            if self.get_next_buf {
                if self.input_done {
                    if self.tail_remaining == 0 {
                        break;
                    }
                    let buffered = self.history[0].len();
                    if buffered < self.window.size {
                        let pad = self.window.size - buffered;
                        for queue in &mut self.history {
                            queue.extend_zeros(pad);
                        }
                    }
                } else if self.history[0].len() < self.window.size {
                    break;
                }
            }
            self.step(out);
        }
    }

    /// One emitted block: optionally pull a fresh analysis frame, then
    /// synthesize `half_size` samples per channel and advance the tick.
    fn step(&mut self, out: &mut Vec<u8>) {
        if self.get_next_buf {
            self.pull_frame();
            self.get_next_buf = false;
        }

        let size = self.window.size;
        let half = self.window.half_size;
        let blend = self.displace_tick as f32;
        let norm = 1.0 / size as f32;

        for ch in 0..self.channels {
            for bin in 0..=half {
                let mag =
                    self.freqs[ch][bin] * blend + self.old_freqs[ch][bin] * (1.0 - blend);
                let phase = self.rng.random::<f32>() * TWO_PI;
                self.fft_buffer[bin] = Complex::new(mag * phase.cos(), mag * phase.sin());
            }
            // Mirror the negative frequencies so the inverse transform
            // lands on a real signal.
            for bin in half + 1..size {
                self.fft_buffer[bin] = self.fft_buffer[size - bin].conj();
            }

            self.fft_inverse.process(&mut self.fft_buffer);

            for i in 0..half {
                let synthesized = self.fft_buffer[i].re * norm * self.window.weights[i];
                let sample = (synthesized + self.carry[ch][i]) * self.window.compensation[i];
                self.block[ch][i] = sample.clamp(-1.0, 1.0);
                self.carry[ch][i] =
                    self.fft_buffer[i + half].re * norm * self.window.weights[i + half];
            }
        }

        out.extend_from_slice(&encode_frames(&self.block));
        self.advance_tick();
    }

    /// Saves the current magnitude frame as "previous", analyzes the next
    /// window of history, and hops forward by half a window.
    fn pull_frame(&mut self) {
        let half = self.window.half_size;

        for ch in 0..self.channels {
            std::mem::swap(&mut self.old_freqs[ch], &mut self.freqs[ch]);

            self.frame.iter_mut().for_each(|s| *s = 0.0);
            self.history[ch].peek_slice(&mut self.frame);
            for (slot, (&sample, &weight)) in self
                .fft_buffer
                .iter_mut()
                .zip(self.frame.iter().zip(self.window.weights.iter()))
            {
                *slot = Complex::new(sample * weight, 0.0);
            }

            self.fft_forward.process(&mut self.fft_buffer);

            for bin in 0..=half {
                self.freqs[ch][bin] = self.fft_buffer[bin].norm();
            }

            self.history[ch].discard(half);
        }

        if self.input_done {
            self.tail_remaining = self.tail_remaining.saturating_sub(half);
        }
    }

    /// Advances the blend position, drawing half of the scheduled increment
    /// from the onset credit while any is banked. On wrap, the next step
    /// must pull a fresh frame.
    fn advance_tick(&mut self) {
        if self.extra_onset_credit > 0.0 {
            let credit_get = 0.5 * self.tick_increase;
            self.extra_onset_credit = (self.extra_onset_credit - credit_get).max(0.0);
            self.displace_tick += self.tick_increase - credit_get;
        } else {
            self.displace_tick += self.tick_increase;
        }

        if self.displace_tick >= 1.0 {
            self.displace_tick %= 1.0;
            self.get_next_buf = true;
        }
    }
}
