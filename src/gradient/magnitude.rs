//! Winner-take-all channel selection, magnitude and orientation per row.
use crate::angle::AcosTable;
use crate::lanes::{split, BinaryKernel, Lane, VectorWidth};
use std::f32::consts::PI;
use wide::f32x4;

/// Ceiling applied to magnitudes and to the reciprocal used for orientation.
pub const MAGNITUDE_CEILING: f32 = 1e10;

/// `gx² + gy²`
pub(crate) struct SquaredNorm;

impl BinaryKernel for SquaredNorm {
    #[inline]
    fn apply<L: Lane>(&self, gx: L, gy: L) -> L {
        gx * gx + gy * gy
    }
}

/// `m / (s + norm)`
pub(crate) struct NormalizeBy {
    pub norm: f32,
}

impl BinaryKernel for NormalizeBy {
    #[inline]
    fn apply<L: Lane>(&self, m: L, s: L) -> L {
        m / (s + L::splat(self.norm))
    }
}

/// Borrowed row triple `(gx, gy, gx² + gy²)`.
pub(crate) struct GradRow<'a> {
    pub gx: &'a mut [f32],
    pub gy: &'a mut [f32],
    pub m2: &'a mut [f32],
}

/// Replaces `best` by `cand` wherever the candidate is strictly stronger.
/// Ties keep the earlier channel.
pub(crate) fn keep_strongest(width: VectorWidth, best: &mut GradRow<'_>, cand: &GradRow<'_>) {
    match width {
        VectorWidth::Scalar => keep_strongest_lanes::<f32>(best, cand),
        VectorWidth::X4 => keep_strongest_lanes::<f32x4>(best, cand),
    }
}

fn keep_strongest_lanes<L: Lane>(best: &mut GradRow<'_>, cand: &GradRow<'_>) {
    let (body, tail) = split::<L>(best.m2.len());
    for i in body {
        step::<L>(i, best, cand);
    }
    for i in tail {
        step::<f32>(i, best, cand);
    }

    #[inline]
    fn step<L: Lane>(i: usize, best: &mut GradRow<'_>, cand: &GradRow<'_>) {
        let m2_best = L::load(&best.m2[i..]);
        let m2_cand = L::load(&cand.m2[i..]);
        let gx = m2_cand.select_gt(m2_best, L::load(&cand.gx[i..]), L::load(&best.gx[i..]));
        let gy = m2_cand.select_gt(m2_best, L::load(&cand.gy[i..]), L::load(&best.gy[i..]));
        let m2 = m2_cand.select_gt(m2_best, m2_cand, m2_best);
        gx.store(&mut best.gx[i..]);
        gy.store(&mut best.gy[i..]);
        m2.store(&mut best.m2[i..]);
    }
}

/// Magnitude and orientation of one row from its strongest gradients.
///
/// The orientation is `acos(gx / |g|)`, mirrored into the lower half-plane
/// when `gy` carries a sign bit, which yields `[0, π)`. With `full` the
/// angle gains `π` where `gy < 0`, covering `[0, 2π)`.
pub(crate) fn magnitude_orientation_row(
    width: VectorWidth,
    row: &GradRow<'_>,
    full: bool,
    mag: &mut [f32],
    ori: &mut [f32],
) {
    match width {
        VectorWidth::Scalar => mag_ori_lanes::<f32>(row, full, mag, ori),
        VectorWidth::X4 => mag_ori_lanes::<f32x4>(row, full, mag, ori),
    }
}

fn mag_ori_lanes<L: Lane>(row: &GradRow<'_>, full: bool, mag: &mut [f32], ori: &mut [f32]) {
    let table = AcosTable::get();
    let (body, tail) = split::<L>(mag.len());
    for i in body {
        step::<L>(i, table, row, full, mag, ori);
    }
    for i in tail {
        step::<f32>(i, table, row, full, mag, ori);
    }

    #[inline]
    fn step<L: Lane>(
        i: usize,
        table: &AcosTable,
        row: &GradRow<'_>,
        full: bool,
        mag: &mut [f32],
        ori: &mut [f32],
    ) {
        let ceiling = L::splat(MAGNITUDE_CEILING);
        let m2 = L::load(&row.m2[i..]);
        let gy = L::load(&row.gy[i..]);
        let root = m2.sqrt();
        let inv = (L::splat(1.0) / root).min(ceiling);
        root.min(ceiling).store(&mut mag[i..]);

        let scaled = (L::load(&row.gx[i..]) * inv * L::splat(table.scale())).xor_sign(gy);
        let mut cosines = [0.0f32; 4];
        scaled.store(&mut cosines);
        let mut angles = [0.0f32; 4];
        for (a, &c) in angles.iter_mut().zip(&cosines).take(L::WIDTH) {
            *a = table.lookup(c);
        }
        let mut angle = L::load(&angles);
        if full {
            angle = angle + gy.if_negative(PI);
        }
        angle.store(&mut ori[i..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_from(gx: &[f32], gy: &[f32]) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        let m2 = gx.iter().zip(gy).map(|(a, b)| a * a + b * b).collect();
        (gx.to_vec(), gy.to_vec(), m2)
    }

    #[test]
    fn strongest_channel_wins_and_ties_keep_first() {
        let (mut bx, mut by, mut bm) = row_from(&[1.0, 2.0, 0.0, 3.0, 1.0], &[0.0; 5]);
        let (mut cx, mut cy, mut cm) = row_from(&[0.5, -3.0, 0.0, 3.0, 0.0], &[0.0, 0.0, 0.0, 0.0, 2.0]);
        let mut best = GradRow {
            gx: &mut bx,
            gy: &mut by,
            m2: &mut bm,
        };
        let cand = GradRow {
            gx: &mut cx,
            gy: &mut cy,
            m2: &mut cm,
        };
        keep_strongest(VectorWidth::X4, &mut best, &cand);
        assert_eq!(best.gx, &[1.0, -3.0, 0.0, 3.0, 0.0]);
        assert_eq!(best.gy, &[0.0, 0.0, 0.0, 0.0, 2.0]);
        assert_eq!(best.m2, &[1.0, 9.0, 0.0, 9.0, 4.0]);
    }

    #[test]
    fn orientation_covers_expected_ranges() {
        let gx = [1.0f32, 0.0, -1.0, 0.0, 1.0, -1.0, 0.0];
        let gy = [0.0f32, 1.0, 0.0, -1.0, -1.0, -1.0, 0.0];
        for full in [false, true] {
            let (mut x, mut y, mut m2) = row_from(&gx, &gy);
            let row = GradRow {
                gx: &mut x,
                gy: &mut y,
                m2: &mut m2,
            };
            let mut mag = vec![0.0; 7];
            let mut ori = vec![0.0; 7];
            magnitude_orientation_row(VectorWidth::X4, &row, full, &mut mag, &mut ori);
            let upper = if full { 2.0 * PI } else { PI };
            assert!(ori.iter().all(|&o| (0.0..upper).contains(&o)), "{ori:?}");
            assert_eq!(mag[6], 0.0);
            assert!((mag[4] - 2.0f32.sqrt()).abs() < 1e-6);
            if full {
                // gy < 0 with gx = 0 points straight down: 3π/2
                assert!((ori[3] - 1.5 * PI).abs() < 1e-3, "{}", ori[3]);
            } else {
                assert!((ori[3] - 0.5 * PI).abs() < 1e-3, "{}", ori[3]);
            }
        }
    }

    #[test]
    fn vector_and_scalar_rows_are_identical() {
        let gx: Vec<f32> = (0..11).map(|i| (i as f32 * 0.7).sin()).collect();
        let gy: Vec<f32> = (0..11).map(|i| (i as f32 * 1.3).cos() - 0.2).collect();
        let mut outs = Vec::new();
        for width in [VectorWidth::Scalar, VectorWidth::X4] {
            let (mut x, mut y, mut m2) = row_from(&gx, &gy);
            let row = GradRow {
                gx: &mut x,
                gy: &mut y,
                m2: &mut m2,
            };
            let mut mag = vec![0.0; 11];
            let mut ori = vec![0.0; 11];
            magnitude_orientation_row(width, &row, true, &mut mag, &mut ori);
            outs.push((mag, ori));
        }
        assert_eq!(outs[0], outs[1]);
    }
}
