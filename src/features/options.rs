//! Parameter types for the HOG and FHOG extractors.
//!
//! Both structs deserialize with `#[serde(default)]`, so a configuration only
//! needs to name the fields it changes.
use crate::error::{FeatureError, Result};
use crate::hog::BinningPolicy;
use crate::lanes::VectorWidth;
use serde::{Deserialize, Serialize};

/// Channel layout of a HOG tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HogLayout {
    /// One channel per orientation: the four clipped normalizations summed
    /// with weight 0.5.
    #[default]
    Collapsed,
    /// Four channels per orientation, one per normalization block,
    /// normalization-major.
    PerNormalization,
}

/// Histogram of oriented gradients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HogParams {
    /// Cell side length in pixels (>= 1)
    pub bin_size: usize,
    /// Number of orientation bins (>= 1)
    pub n_orients: usize,
    /// Ceiling applied to every normalized response
    pub clip: f32,
    /// Signed orientations over [0, 2π) instead of [0, π)
    pub full: bool,
    pub binning: BinningPolicy,
    pub layout: HogLayout,
    pub vector_width: VectorWidth,
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            bin_size: 8,
            n_orients: 9,
            clip: 0.2,
            full: false,
            binning: BinningPolicy::Spatial,
            layout: HogLayout::Collapsed,
            vector_width: VectorWidth::X4,
        }
    }
}

impl HogParams {
    pub fn new(bin_size: usize, n_orients: usize) -> Self {
        Self {
            bin_size,
            n_orients,
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: HogLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_binning(mut self, binning: BinningPolicy) -> Self {
        self.binning = binning;
        self
    }

    pub fn with_vector_width(mut self, vector_width: VectorWidth) -> Self {
        self.vector_width = vector_width;
        self
    }

    pub fn channel_count(&self) -> usize {
        match self.layout {
            HogLayout::Collapsed => self.n_orients,
            HogLayout::PerNormalization => 4 * self.n_orients,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_common(self.bin_size, self.n_orients, self.clip)
    }
}

/// Felzenszwalb HOG: contrast-sensitive, contrast-insensitive and texture
/// channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FhogParams {
    /// Cell side length in pixels (>= 1)
    pub bin_size: usize,
    /// Contrast-insensitive orientation bins; the sensitive histogram uses
    /// twice as many.
    pub n_orients: usize,
    pub clip: f32,
    pub binning: BinningPolicy,
    /// Append one all-zero channel after the texture channels.
    pub zero_channel: bool,
    pub vector_width: VectorWidth,
}

impl Default for FhogParams {
    fn default() -> Self {
        Self {
            bin_size: 4,
            n_orients: 9,
            clip: 0.2,
            binning: BinningPolicy::Spatial,
            zero_channel: false,
            vector_width: VectorWidth::X4,
        }
    }
}

impl FhogParams {
    pub fn new(bin_size: usize, n_orients: usize) -> Self {
        Self {
            bin_size,
            n_orients,
            ..Default::default()
        }
    }

    pub fn with_zero_channel(mut self, zero_channel: bool) -> Self {
        self.zero_channel = zero_channel;
        self
    }

    pub fn with_binning(mut self, binning: BinningPolicy) -> Self {
        self.binning = binning;
        self
    }

    pub fn with_vector_width(mut self, vector_width: VectorWidth) -> Self {
        self.vector_width = vector_width;
        self
    }

    /// `3 * n_orients + 4`, plus one when the zero channel is requested.
    pub fn channel_count(&self) -> usize {
        3 * self.n_orients + 4 + usize::from(self.zero_channel)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_common(self.bin_size, self.n_orients, self.clip)
    }
}

fn validate_common(bin_size: usize, n_orients: usize, clip: f32) -> Result<()> {
    if bin_size == 0 {
        return Err(FeatureError::InvalidParameter("bin_size must be >= 1".into()));
    }
    if n_orients == 0 {
        return Err(FeatureError::InvalidParameter("n_orients must be >= 1".into()));
    }
    if !(clip.is_finite() && clip > 0.0) {
        return Err(FeatureError::InvalidParameter(format!(
            "clip must be a positive finite value (got {clip})"
        )));
    }
    Ok(())
}
