#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod image;

// Building blocks – public for callers that run stages themselves.
pub mod angle;
pub mod config;
pub mod gradient;
pub mod hog;
pub mod lanes;
pub mod scratch;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{FeatureError, Result};
pub use crate::features::{
    compute_fhog, compute_fhog_into, compute_gradient_magnitude, compute_hog, compute_hog_into,
    fhog_from_gradients, hog_from_gradients, FeatureTensor, FhogParams, HogLayout, HogParams,
};
pub use crate::gradient::{normalize_magnitude, GradientMagnitude};
pub use crate::hog::{gradient_histogram, BinningPolicy, Histogram, HistogramParams};
pub use crate::lanes::VectorWidth;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use hog_features::prelude::*;
///
/// # fn main() -> Result<(), FeatureError> {
/// let (w, h) = (64usize, 48usize);
/// let gray: Vec<f32> = (0..w * h).map(|i| (i % w) as f32 / w as f32).collect();
/// let input = ImageInput::gray_f32(w, h, &gray);
///
/// let hog = compute_hog(&input, &HogParams::default())?;
/// assert_eq!(hog.shape(), [9, 6, 8]);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageInput};
    pub use crate::{
        compute_fhog, compute_gradient_magnitude, compute_hog, BinningPolicy, FeatureError,
        FeatureTensor, FhogParams, HogParams, VectorWidth,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::diagnostics::{StageTiming, TimingBreakdown};
    pub use crate::features::{compute_fhog_with_timing, compute_hog_with_timing};
    pub use crate::hog::{assemble_channels, block_norms, ChannelMode, NormMap};
}
