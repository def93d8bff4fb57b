//! Dense gradient estimation on planar float images.
//!
//! - Finite differences per channel (central in the interior, one-sided at
//!   the border, see [`diff`]).
//! - Per pixel, the channel with the largest `gx² + gy²` wins; its
//!   gradients are kept, the others are discarded.
//! - Magnitude `sqrt(gx² + gy²)` (capped at [`MAGNITUDE_CEILING`]) and
//!   orientation from the shared arc-cosine table.
//!
//! Rows are processed one at a time through aligned scratch rows, so the
//! working set is a handful of `width`-sized buffers regardless of height.
pub(crate) mod diff;
pub(crate) mod magnitude;

pub use magnitude::MAGNITUDE_CEILING;

use crate::error::{FeatureError, Result};
use crate::image::{ImageF32, ImageView, PlanarImage};
use crate::lanes::{map2_with, update2_with, VectorWidth};
use crate::scratch::{AlignedBuf, ScratchArena};
use magnitude::{keep_strongest, magnitude_orientation_row, GradRow, NormalizeBy, SquaredNorm};

/// Gradient magnitude and orientation planes, same size as the image.
#[derive(Clone, Debug)]
pub struct GradientMagnitude {
    /// Magnitude per pixel, `>= 0`
    pub mag: ImageF32,
    /// Orientation in radians, `[0, π)` or `[0, 2π)` when computed `full`
    pub ori: ImageF32,
}

struct RowScratch {
    gx: AlignedBuf,
    gy: AlignedBuf,
    m2: AlignedBuf,
}

impl RowScratch {
    fn new(arena: &mut ScratchArena, w: usize) -> Self {
        Self {
            gx: arena.floats(w),
            gy: arena.floats(w),
            m2: arena.floats(w),
        }
    }

    fn as_row(&mut self) -> GradRow<'_> {
        GradRow {
            gx: self.gx.as_mut_slice(),
            gy: self.gy.as_mut_slice(),
            m2: self.m2.as_mut_slice(),
        }
    }

    fn compute(&mut self, width: VectorWidth, image: &PlanarImage, c: usize, y: usize) {
        let plane = image.channel(c);
        diff::diff_x(width, plane.row(y), self.gx.as_mut_slice());
        diff::diff_y(width, &plane, y, self.gy.as_mut_slice());
        map2_with(
            width,
            &SquaredNorm,
            self.gx.as_slice(),
            self.gy.as_slice(),
            self.m2.as_mut_slice(),
        );
    }
}

/// Walks the image row by row, handing the winning gradients to `sink`.
fn for_each_strongest_row(
    image: &PlanarImage,
    width: VectorWidth,
    mut sink: impl FnMut(usize, &GradRow<'_>),
) {
    let mut arena = ScratchArena::new();
    let mut best = RowScratch::new(&mut arena, image.w);
    let mut cand = RowScratch::new(&mut arena, image.w);
    for y in 0..image.h {
        best.compute(width, image, 0, y);
        for c in 1..image.channels {
            cand.compute(width, image, c, y);
            keep_strongest(width, &mut best.as_row(), &cand.as_row());
        }
        sink(y, &best.as_row());
    }
}

/// Magnitude and orientation of the strongest channel at every pixel.
pub fn gradient_magnitude(image: &PlanarImage, full: bool, width: VectorWidth) -> GradientMagnitude {
    let mut mag = ImageF32::new(image.w, image.h);
    let mut ori = ImageF32::new(image.w, image.h);
    for_each_strongest_row(image, width, |y, row| {
        let start = y * image.w;
        let end = start + image.w;
        magnitude_orientation_row(
            width,
            row,
            full,
            &mut mag.data[start..end],
            &mut ori.data[start..end],
        );
    });
    GradientMagnitude { mag, ori }
}

/// Divides a magnitude plane by a reference plane plus `norm`, in place:
/// `mag = mag / (reference + norm)`.
///
/// Typically `reference` is a smoothed copy of `mag`, which equalizes local
/// contrast before histogramming.
pub fn normalize_magnitude(
    mag: &mut ImageF32,
    reference: &ImageF32,
    norm: f32,
    width: VectorWidth,
) -> Result<()> {
    if (mag.w, mag.h) != (reference.w, reference.h) {
        return Err(FeatureError::DimensionMismatch {
            what: "normalization reference",
            expected: vec![mag.h, mag.w],
            actual: vec![reference.h, reference.w],
        });
    }
    update2_with(width, &NormalizeBy { norm }, &mut mag.data, &reference.data);
    Ok(())
}
