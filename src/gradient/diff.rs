//! Finite differences along rows and columns of one plane.
//!
//! Interior samples use the central difference `(I[+1] − I[−1]) / 2`; the
//! first and last sample along an axis use the one-sided difference
//! `I[+1] − I[0]` (or `I[n−1] − I[n−2]`) without halving. A linear ramp
//! therefore has the same slope at the border as in the interior. Axes of
//! length one have zero derivative.
use crate::image::ImageView;
use crate::lanes::{map2_with, BinaryKernel, Lane, VectorWidth};

/// `(next − prev) · r`
pub(crate) struct ScaledDiff {
    pub r: f32,
}

impl BinaryKernel for ScaledDiff {
    #[inline]
    fn apply<L: Lane>(&self, next: L, prev: L) -> L {
        (next - prev) * L::splat(self.r)
    }
}

/// Horizontal derivative of one row.
pub(crate) fn diff_x(width: VectorWidth, row: &[f32], out: &mut [f32]) {
    let w = row.len();
    if w < 2 {
        out[..w].fill(0.0);
        return;
    }
    let edge = ScaledDiff { r: 1.0 };
    out[0] = edge.apply(row[1], row[0]);
    out[w - 1] = edge.apply(row[w - 1], row[w - 2]);
    if w > 2 {
        map2_with(
            width,
            &ScaledDiff { r: 0.5 },
            &row[2..],
            &row[..w - 2],
            &mut out[1..w - 1],
        );
    }
}

/// Vertical derivative of row `y`.
pub(crate) fn diff_y<I: ImageView<Pixel = f32>>(
    width: VectorWidth,
    plane: &I,
    y: usize,
    out: &mut [f32],
) {
    let (w, h) = (plane.width(), plane.height());
    if h < 2 {
        out[..w].fill(0.0);
        return;
    }
    let (prev, next, r) = if y == 0 {
        (0, 1, 1.0)
    } else if y == h - 1 {
        (h - 2, h - 1, 1.0)
    } else {
        (y - 1, y + 1, 0.5)
    };
    map2_with(
        width,
        &ScaledDiff { r },
        plane.row(next),
        plane.row(prev),
        &mut out[..w],
    );
}
