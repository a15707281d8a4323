//! Growable FIFO queue for per-channel sample history.
//!
//! Each streaming stage keeps one queue per channel and gates its next
//! processing step on a "has enough buffered" check, so memory stays
//! bounded by one window plus whatever the caller pushes per chunk.

use std::collections::VecDeque;

use crate::core::types::Sample;

/// Unbounded FIFO of samples with front peeking and bulk discard.
#[derive(Debug, Clone, Default)]
pub struct SampleQueue {
    data: VecDeque<Sample>,
}

impl SampleQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty queue with room for `cap` samples before
    /// reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(cap),
        }
    }

    /// Returns the number of buffered samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true when no samples are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Removes all buffered samples.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Appends samples at the back.
    pub fn push_slice(&mut self, input: &[Sample]) {
        self.data.extend(input.iter().copied());
    }

    /// Appends `n` zero samples at the back.
    pub fn extend_zeros(&mut self, n: usize) {
        self.data.extend(std::iter::repeat(0.0).take(n));
    }

    /// Copies samples from the front into `out` without removing them.
    ///
    /// Returns the number of copied samples (short when fewer are buffered).
    pub fn peek_slice(&self, out: &mut [Sample]) -> usize {
        let to_copy = out.len().min(self.data.len());
        let (front, back) = self.data.as_slices();
        let first = to_copy.min(front.len());
        out[..first].copy_from_slice(&front[..first]);
        let second = to_copy - first;
        if second > 0 {
            out[first..to_copy].copy_from_slice(&back[..second]);
        }
        to_copy
    }

    /// Discards up to `n` samples from the front.
    ///
    /// Returns the number of samples discarded.
    pub fn discard(&mut self, n: usize) -> usize {
        let to_drop = n.min(self.data.len());
        self.data.drain(..to_drop);
        to_drop
    }
}
