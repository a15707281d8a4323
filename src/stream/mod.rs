pub mod pipeline;

pub use pipeline::StretchPipeline;
