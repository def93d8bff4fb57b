//! Serializable run diagnostics.
//!
//! The extractors record one [`StageTiming`] per pipeline stage (gradient,
//! histogram, normalization, channels); the extraction tool writes them to
//! its JSON summary.
mod timing;

pub use timing::{StageTiming, TimingBreakdown};
