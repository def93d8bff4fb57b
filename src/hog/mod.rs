//! Histogram-of-oriented-gradients core.
//!
//! Pipeline on a `(magnitude, orientation)` pair:
//!
//! 1. [`quantize`]: per pixel, one or two orientation bins with weights,
//!    magnitudes pre-scaled by `1 / bin²` so cells hold averages.
//! 2. [`histogram`]: votes routed into an `orientation × cells_y × cells_x`
//!    grid with one of the [`BinningPolicy`] interpolation schemes.
//! 3. [`normalize`]: inverse 2×2-block energy norms on a grid padded by one
//!    cell on every side.
//! 4. [`channels`]: clipped, normalized responses assembled into HOG or
//!    FHOG channel layouts.
pub mod channels;
pub mod histogram;
pub mod normalize;
pub(crate) mod quantize;

pub use channels::{assemble_channels, ChannelMode, FHOG_TEXTURE_SCALE};
pub use histogram::{gradient_histogram, Histogram, HistogramParams};
pub use normalize::{block_norms, norm_epsilon, NormMap};

use serde::{Deserialize, Serialize};

/// How a pixel's vote is spread over orientation bins and cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningPolicy {
    /// Nearest orientation bin, own cell only.
    Nearest,
    /// Two neighbouring orientation bins, own cell only.
    Orientation,
    /// Nearest orientation bin, bilinear over the 2×2 nearest cells.
    #[default]
    Spatial,
    /// Two orientation bins × 2×2 cells.
    Trilinear,
}

impl BinningPolicy {
    pub fn interpolates_orientation(self) -> bool {
        matches!(self, BinningPolicy::Orientation | BinningPolicy::Trilinear)
    }

    pub fn interpolates_space(self) -> bool {
        matches!(self, BinningPolicy::Spatial | BinningPolicy::Trilinear)
    }
}
