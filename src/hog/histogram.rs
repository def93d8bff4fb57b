//! Spatial binning of quantized gradient votes into a cell histogram.
//!
//! The histogram covers the `cells_x * bin × cells_y * bin` top-left region
//! of the image; trailing pixels that do not fill a whole cell are ignored.
//!
//! With spatial interpolation each pixel votes into the (up to) four cells
//! whose centres surround it, weighted bilinearly. Border cells then only
//! collect 7/8 of the mass an interior cell would see along each border
//! axis, which is compensated by scaling the outermost cell rows and columns
//! by 8/7 (corners twice).
use super::quantize::{QuantizedRow, Quantizer};
use super::BinningPolicy;
use crate::error::{FeatureError, Result};
use crate::image::{ImageF32, ImageView};
use crate::lanes::VectorWidth;
use crate::scratch::ScratchArena;
use serde::{Deserialize, Serialize};

/// Border cell correction for spatially interpolated histograms.
const BORDER_GAIN: f32 = 8.0 / 7.0;

/// Orientation histogram per cell, stored as `n_orients` planes of
/// `cells_y × cells_x` values in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub n_orients: usize,
    pub cells_x: usize,
    pub cells_y: usize,
    pub data: Vec<f32>,
}

/// Parameters of a raw gradient histogram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramParams {
    /// Cell side length in pixels (>= 1)
    pub bin_size: usize,
    /// Number of orientation bins (>= 1)
    pub n_orients: usize,
    /// Orientations span [0, 2π) instead of [0, π)
    pub full: bool,
    pub binning: BinningPolicy,
    pub vector_width: VectorWidth,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            bin_size: 8,
            n_orients: 9,
            full: false,
            binning: BinningPolicy::Spatial,
            vector_width: VectorWidth::X4,
        }
    }
}

impl Histogram {
    pub fn zeros(n_orients: usize, cells_x: usize, cells_y: usize) -> Self {
        Self {
            n_orients,
            cells_x,
            cells_y,
            data: vec![0.0; n_orients * cells_x * cells_y],
        }
    }

    #[inline]
    pub fn plane_len(&self) -> usize {
        self.cells_x * self.cells_y
    }

    #[inline]
    pub fn idx(&self, o: usize, cx: usize, cy: usize) -> usize {
        o * self.plane_len() + cy * self.cells_x + cx
    }

    #[inline]
    pub fn get(&self, o: usize, cx: usize, cy: usize) -> f32 {
        self.data[self.idx(o, cx, cy)]
    }

    pub fn plane(&self, o: usize) -> &[f32] {
        let len = self.plane_len();
        &self.data[o * len..(o + 1) * len]
    }

    /// Sum over all orientations of one cell.
    pub fn cell_sum(&self, cx: usize, cy: usize) -> f32 {
        (0..self.n_orients).map(|o| self.get(o, cx, cy)).sum()
    }

    pub fn total(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Contrast-insensitive fold: bin `o` plus its antipodal bin
    /// `o + n_orients / 2`.
    pub fn fold_antipodal(&self) -> Histogram {
        let half = self.n_orients / 2;
        let len = self.plane_len();
        let mut out = Histogram::zeros(half, self.cells_x, self.cells_y);
        for o in 0..half {
            let (a, b) = (self.plane(o), self.plane(o + half));
            for (dst, (&x, &y)) in out.data[o * len..(o + 1) * len]
                .iter_mut()
                .zip(a.iter().zip(b))
            {
                *dst = x + y;
            }
        }
        out
    }

    /// Routes the gradients of the covered region into the histogram.
    pub(crate) fn accumulate(
        &mut self,
        mag: &ImageF32,
        ori: &ImageF32,
        bin: usize,
        full: bool,
        binning: BinningPolicy,
        width: VectorWidth,
    ) {
        let (w0, h0) = (self.cells_x * bin, self.cells_y * bin);
        if w0 == 0 || h0 == 0 {
            return;
        }
        let norm = 1.0 / (bin as f32 * bin as f32);
        let quantizer = Quantizer::new(
            self.n_orients,
            full,
            self.plane_len(),
            norm,
            binning.interpolates_orientation(),
        );
        let mut arena = ScratchArena::new();
        let mut q = QuantizedRow::new(&mut arena, w0);
        let spatial = binning.interpolates_space() && bin > 1;
        let columns: Vec<AxisWeight> = (0..w0)
            .map(|x| AxisWeight::new(x, bin, self.cells_x))
            .collect();

        for y in 0..h0 {
            quantizer.quantize(width, &ori.row(y)[..w0], &mag.row(y)[..w0], &mut q);
            let (m0, m1) = (q.m0.as_slice(), q.m1.as_slice());
            if spatial {
                let row = AxisWeight::new(y, bin, self.cells_y);
                for (x, col) in columns.iter().enumerate() {
                    self.vote_spatial(col, &row, q.o0[x], q.o1[x], m0[x], m1[x]);
                }
            } else {
                let base = (y / bin) * self.cells_x;
                let secondary = binning.interpolates_orientation();
                for x in 0..w0 {
                    let cell = base + x / bin;
                    self.data[q.o0[x] + cell] += m0[x];
                    if secondary {
                        self.data[q.o1[x] + cell] += m1[x];
                    }
                }
            }
        }
    }

    #[inline]
    fn vote_spatial(&mut self, col: &AxisWeight, row: &AxisWeight, o0: usize, o1: usize, m0: f32, m1: f32) {
        let (xd, yd) = (col.d, row.d);
        let xyd = xd * yd;
        // (lo, lo), (lo, hi), (hi, lo), (hi, hi) as (x, y)
        let stencil = [
            (col.lo, row.lo, 1.0 - xd - yd + xyd),
            (col.lo, row.hi, yd - xyd),
            (col.hi, row.lo, xd - xyd),
            (col.hi, row.hi, xyd),
        ];
        for (cx, cy, w) in stencil {
            if let (Some(cx), Some(cy)) = (cx, cy) {
                let cell = cy * self.cells_x + cx;
                self.data[o0 + cell] += w * m0;
                if m1 != 0.0 {
                    self.data[o1 + cell] += w * m1;
                }
            }
        }
    }

    /// Scales the outermost cell rows and columns of every orientation by 8/7.
    pub(crate) fn correct_borders(&mut self) {
        let (wb, hb) = (self.cells_x, self.cells_y);
        if wb == 0 || hb == 0 {
            return;
        }
        for o in 0..self.n_orients {
            for cy in 0..hb {
                let i = self.idx(o, 0, cy);
                self.data[i] *= BORDER_GAIN;
            }
            for cx in 0..wb {
                let i = self.idx(o, cx, 0);
                self.data[i] *= BORDER_GAIN;
            }
            for cy in 0..hb {
                let i = self.idx(o, wb - 1, cy);
                self.data[i] *= BORDER_GAIN;
            }
            for cx in 0..wb {
                let i = self.idx(o, cx, hb - 1);
                self.data[i] *= BORDER_GAIN;
            }
        }
    }
}

/// Bilinear weights of one pixel coordinate along one axis.
///
/// `lo`/`hi` are the cells whose centres bracket the pixel centre; either may
/// be missing at the grid border. `d` is the weight of `hi`, `1 − d` that of
/// `lo`.
#[derive(Clone, Copy, Debug)]
struct AxisWeight {
    lo: Option<usize>,
    hi: Option<usize>,
    d: f32,
}

impl AxisWeight {
    fn new(t: usize, bin: usize, cells: usize) -> Self {
        let tb = (t as f32 + 0.5) / bin as f32 - 0.5;
        let t0 = if tb >= 0.0 { tb as isize } else { -1 };
        Self {
            lo: (t0 >= 0).then_some(t0 as usize),
            hi: (t0 + 1 < cells as isize).then_some((t0 + 1) as usize),
            d: tb - t0 as f32,
        }
    }
}

/// Raw (unnormalized) gradient histogram of a magnitude/orientation pair.
pub fn gradient_histogram(mag: &ImageF32, ori: &ImageF32, params: &HistogramParams) -> Result<Histogram> {
    if (mag.w, mag.h) != (ori.w, ori.h) {
        return Err(FeatureError::DimensionMismatch {
            what: "orientation plane",
            expected: vec![mag.h, mag.w],
            actual: vec![ori.h, ori.w],
        });
    }
    if params.bin_size == 0 || params.n_orients == 0 {
        return Err(FeatureError::InvalidParameter(format!(
            "bin_size and n_orients must be >= 1 (got {} and {})",
            params.bin_size, params.n_orients
        )));
    }
    let bin = params.bin_size;
    let mut hist = Histogram::zeros(params.n_orients, mag.w / bin, mag.h / bin);
    hist.accumulate(mag, ori, bin, params.full, params.binning, params.vector_width);
    if params.binning.interpolates_space() && bin > 1 {
        hist.correct_borders();
    }
    Ok(hist)
}
