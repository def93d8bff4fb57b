//! Error taxonomy for the feature extraction entry points.
//!
//! Every variant is raised during validation, before any buffer owned by
//! the caller is touched. Numerical corner cases (zero norms, orientation
//! wrap) are absorbed by clamping inside the kernels and never surface here.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("unsupported input: {pixel} pixels with {channels} channel(s), expected f32 with 1 or 3 channels")]
    InvalidInputType {
        pixel: &'static str,
        channels: usize,
    },

    #[error("dimension mismatch for {what}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
