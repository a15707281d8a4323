//! Core types, window math, and streaming buffers.

pub mod buffer;
pub mod types;
pub mod window;

pub use buffer::SampleQueue;
pub use types::{Sample, StreamSpec, StretchParams};
pub use window::{optimize_window_size, AnalysisWindow, MIN_WINDOW_SIZE};
