//! Analysis window geometry: FFT-friendly size selection, the Hann
//! weighting sequence, and the inverse-overlap compensation applied after
//! overlap-add.

use std::f64::consts::PI;

/// Smallest analysis window the engine accepts. Shorter requests are raised
/// to this floor before size optimization, not rejected.
pub const MIN_WINDOW_SIZE: usize = 16;

/// `(1 + sqrt(0.5)) / 2`, the classic Paulstretch overlap constant.
const HINV_SQRT2: f64 = 0.85355339059327376220;

/// Returns the smallest even 5-smooth integer not less than `n`.
///
/// The FFT performs best on sizes whose prime factors are 2, 3, and 5, and
/// the engine needs an even size for symmetric half-window overlap, so the
/// search walks even candidates only. Terminates for any input because even
/// 5-smooth numbers are unbounded.
pub fn optimize_window_size(n: usize) -> usize {
    let mut size = n.max(2);
    if size % 2 != 0 {
        size += 1;
    }
    loop {
        let mut rem = size;
        for factor in [2, 3, 5] {
            while rem % factor == 0 {
                rem /= factor;
            }
        }
        if rem == 1 {
            return size;
        }
        size += 2;
    }
}

/// Generates a Hann window of the given size.
fn hann_window(size: usize) -> Vec<f32> {
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = (2.0 * PI * i as f64) / (n - 1.0);
            (0.5 - 0.5 * x.cos()) as f32
        })
        .collect()
}

/// Generates the inverse-overlap compensation sequence of length
/// `half_size`. Each emitted half-window is scaled by this to undo the
/// amplitude taper left by windowing both analysis and synthesis.
fn overlap_compensation(half_size: usize) -> Vec<f32> {
    let n = half_size as f64;
    (0..half_size)
        .map(|i| {
            let x = (2.0 * PI * i as f64) / n;
            (2.0 * (HINV_SQRT2 - (1.0 - HINV_SQRT2) * x.cos()) / HINV_SQRT2) as f32
        })
        .collect()
}

/// Derived, immutable window geometry for one stretch session.
#[derive(Debug, Clone)]
pub struct AnalysisWindow {
    /// Window size in samples. Even, 5-smooth, at least [`MIN_WINDOW_SIZE`].
    pub size: usize,
    /// Half the window size; the hop between analysis frames and the length
    /// of each emitted output block.
    pub half_size: usize,
    /// Hann weighting applied at both analysis and synthesis.
    pub weights: Vec<f32>,
    /// Post-overlap-add amplitude compensation, length `half_size`.
    pub compensation: Vec<f32>,
}

impl AnalysisWindow {
    /// Computes the window for the given sample rate and window length in
    /// seconds.
    pub fn new(sample_rate: u32, window_secs: f64) -> Self {
        let requested = (window_secs * sample_rate as f64) as usize;
        let size = optimize_window_size(requested.max(MIN_WINDOW_SIZE));
        let half_size = size / 2;
        Self {
            size,
            half_size,
            weights: hann_window(size),
            compensation: overlap_compensation(half_size),
        }
    }
}
