//! Orientation quantization of one row of `(orientation, magnitude)` pairs.
//!
//! Bin indices are emitted pre-multiplied by the histogram plane length, so
//! they index the orientation plane directly. Orientation bins are circular:
//! an index at or past the last bin wraps to 0.
use crate::lanes::{split, Lane, VectorWidth};
use crate::scratch::{AlignedBuf, ScratchArena};
use std::f32::consts::PI;
use wide::f32x4;

/// Quantized votes for one row.
pub(crate) struct QuantizedRow {
    /// Primary bin offset
    pub o0: Vec<usize>,
    /// Secondary bin offset (0 when not interpolating)
    pub o1: Vec<usize>,
    /// Primary weight
    pub m0: AlignedBuf,
    /// Secondary weight (0 when not interpolating)
    pub m1: AlignedBuf,
}

impl QuantizedRow {
    pub fn new(arena: &mut ScratchArena, len: usize) -> Self {
        Self {
            o0: arena.indices(len),
            o1: arena.indices(len),
            m0: arena.floats(len),
            m1: arena.floats(len),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Quantizer {
    /// Orientation (radians) → continuous bin coordinate
    o_mult: f32,
    /// Distance between consecutive bins in the histogram buffer
    stride: usize,
    /// One past the last valid bin offset
    o_max: usize,
    /// Magnitude scale
    norm: f32,
    interpolate: bool,
}

impl Quantizer {
    pub fn new(n_orients: usize, full: bool, stride: usize, norm: f32, interpolate: bool) -> Self {
        let span = if full { 2.0 * PI } else { PI };
        Self {
            o_mult: n_orients as f32 / span,
            stride,
            o_max: n_orients * stride,
            norm,
            interpolate,
        }
    }

    /// Quantizes `ori.len()` pixels into `out`.
    pub fn quantize(&self, width: VectorWidth, ori: &[f32], mag: &[f32], out: &mut QuantizedRow) {
        let n = ori.len();
        for i in 0..n {
            let o = ori[i] * self.o_mult;
            let (o0, o1) = if self.interpolate {
                let o0 = self.wrap(o.trunc() as usize * self.stride);
                (o0, self.wrap(o0 + self.stride))
            } else {
                (self.wrap((o + 0.5).trunc() as usize * self.stride), 0)
            };
            out.o0[i] = o0;
            out.o1[i] = o1;
        }
        let (m0, m1) = (&mut out.m0.as_mut_slice()[..n], &mut out.m1.as_mut_slice()[..n]);
        match width {
            VectorWidth::Scalar => self.weights::<f32>(ori, mag, m0, m1),
            VectorWidth::X4 => self.weights::<f32x4>(ori, mag, m0, m1),
        }
    }

    #[inline]
    fn wrap(&self, offset: usize) -> usize {
        if offset >= self.o_max {
            0
        } else {
            offset
        }
    }

    fn weights<L: Lane>(&self, ori: &[f32], mag: &[f32], m0: &mut [f32], m1: &mut [f32]) {
        let (body, tail) = split::<L>(m0.len());
        for i in body {
            self.split_weight::<L>(i, ori, mag, m0, m1);
        }
        for i in tail {
            self.split_weight::<f32>(i, ori, mag, m0, m1);
        }
    }

    #[inline]
    fn split_weight<L: Lane>(&self, i: usize, ori: &[f32], mag: &[f32], m0: &mut [f32], m1: &mut [f32]) {
        let m = L::load(&mag[i..]) * L::splat(self.norm);
        if self.interpolate {
            let o = L::load(&ori[i..]) * L::splat(self.o_mult);
            let hi = (o - o.trunc()) * m;
            hi.store(&mut m1[i..]);
            (m - hi).store(&mut m0[i..]);
        } else {
            m.store(&mut m0[i..]);
            L::splat(0.0).store(&mut m1[i..]);
        }
    }
}
