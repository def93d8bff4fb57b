//! Vector-width abstraction shared by all element-wise kernels.
//!
//! Each kernel is written once as a generic function over [`Lane`]. The
//! drivers run the bulk of a slice with the selected lane type and finish the
//! tail with the scalar `f32` lane, so both paths evaluate exactly the same
//! per-element formula. Only IEEE-exact operations (add, sub, mul, div,
//! sqrt, min, compares, sign bits) are exposed, which keeps the scalar and
//! `f32x4` results bit-identical.
use serde::{Deserialize, Serialize};
use std::iter::StepBy;
use std::ops::{Add, Div, Mul, Range, Sub};
use wide::*;

/// Batch size used by the element-wise kernels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorWidth {
    /// One element at a time.
    Scalar,
    /// Four `f32` values per step via `wide::f32x4`.
    #[default]
    X4,
}

pub trait Lane:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    const WIDTH: usize;

    fn splat(v: f32) -> Self;
    /// Reads `WIDTH` values from the front of `src`.
    fn load(src: &[f32]) -> Self;
    /// Writes `WIDTH` values to the front of `dst`.
    fn store(self, dst: &mut [f32]);

    fn sqrt(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn trunc(self) -> Self;
    /// `if self > other { a } else { b }`, per element.
    fn select_gt(self, other: Self, a: Self, b: Self) -> Self;
    /// Flips the sign of `self` wherever `sign` has its sign bit set
    /// (negative zero included).
    fn xor_sign(self, sign: Self) -> Self;
    /// `v` where `self < 0`, zero elsewhere.
    fn if_negative(self, v: f32) -> Self;
}

impl Lane for f32 {
    const WIDTH: usize = 1;

    #[inline]
    fn splat(v: f32) -> Self {
        v
    }
    #[inline]
    fn load(src: &[f32]) -> Self {
        src[0]
    }
    #[inline]
    fn store(self, dst: &mut [f32]) {
        dst[0] = self;
    }
    #[inline]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }
    #[inline]
    fn min(self, other: Self) -> Self {
        // Matches the SSE `min` semantics (second operand on NaN).
        if self < other {
            self
        } else {
            other
        }
    }
    #[inline]
    fn trunc(self) -> Self {
        f32::trunc(self)
    }
    #[inline]
    fn select_gt(self, other: Self, a: Self, b: Self) -> Self {
        if self > other {
            a
        } else {
            b
        }
    }
    #[inline]
    fn xor_sign(self, sign: Self) -> Self {
        f32::from_bits(self.to_bits() ^ (sign.to_bits() & 0x8000_0000))
    }
    #[inline]
    fn if_negative(self, v: f32) -> Self {
        if self < 0.0 {
            v
        } else {
            0.0
        }
    }
}

impl Lane for f32x4 {
    const WIDTH: usize = 4;

    #[inline]
    fn splat(v: f32) -> Self {
        f32x4::splat(v)
    }
    #[inline]
    fn load(src: &[f32]) -> Self {
        f32x4::from([src[0], src[1], src[2], src[3]])
    }
    #[inline]
    fn store(self, dst: &mut [f32]) {
        dst[..4].copy_from_slice(&self.to_array());
    }
    #[inline]
    fn sqrt(self) -> Self {
        f32x4::sqrt(self)
    }
    #[inline]
    fn min(self, other: Self) -> Self {
        self.cmp_lt(other).blend(self, other)
    }
    #[inline]
    fn trunc(self) -> Self {
        f32x4::from(self.to_array().map(f32::trunc))
    }
    #[inline]
    fn select_gt(self, other: Self, a: Self, b: Self) -> Self {
        self.cmp_gt(other).blend(a, b)
    }
    #[inline]
    fn xor_sign(self, sign: Self) -> Self {
        self ^ (sign & f32x4::splat(-0.0))
    }
    #[inline]
    fn if_negative(self, v: f32) -> Self {
        self.cmp_lt(f32x4::ZERO) & f32x4::splat(v)
    }
}

/// Splits `0..len` into lane-sized block starts and a scalar tail.
#[inline]
pub(crate) fn split<L: Lane>(len: usize) -> (StepBy<Range<usize>>, Range<usize>) {
    let body = len - len % L::WIDTH;
    ((0..body).step_by(L::WIDTH), body..len)
}

/// Element-wise binary kernel evaluated identically for every lane type.
pub(crate) trait BinaryKernel {
    fn apply<L: Lane>(&self, a: L, b: L) -> L;
}

/// `out[i] = k(a[i], b[i])`, bulk with `L`, tail with scalars.
pub(crate) fn map2<L: Lane, K: BinaryKernel>(k: &K, a: &[f32], b: &[f32], out: &mut [f32]) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());
    let (body, tail) = split::<L>(out.len());
    for i in body {
        k.apply(L::load(&a[i..]), L::load(&b[i..])).store(&mut out[i..]);
    }
    for i in tail {
        out[i] = k.apply(a[i], b[i]);
    }
}

/// Dispatches [`map2`] on a runtime [`VectorWidth`].
pub(crate) fn map2_with<K: BinaryKernel>(
    width: VectorWidth,
    k: &K,
    a: &[f32],
    b: &[f32],
    out: &mut [f32],
) {
    match width {
        VectorWidth::Scalar => map2::<f32, K>(k, a, b, out),
        VectorWidth::X4 => map2::<f32x4, K>(k, a, b, out),
    }
}

/// `a[i] = k(a[i], b[i])` in place.
pub(crate) fn update2<L: Lane, K: BinaryKernel>(k: &K, a: &mut [f32], b: &[f32]) {
    debug_assert!(b.len() >= a.len());
    let (body, tail) = split::<L>(a.len());
    for i in body {
        k.apply(L::load(&a[i..]), L::load(&b[i..])).store(&mut a[i..]);
    }
    for i in tail {
        a[i] = k.apply(a[i], b[i]);
    }
}

pub(crate) fn update2_with<K: BinaryKernel>(width: VectorWidth, k: &K, a: &mut [f32], b: &[f32]) {
    match width {
        VectorWidth::Scalar => update2::<f32, K>(k, a, b),
        VectorWidth::X4 => update2::<f32x4, K>(k, a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<f32> {
        vec![-2.5, -0.0, 0.0, 1.0, 3.75, -7.25, 1e-12, 9.5, -1.0, 0.3]
    }

    #[test]
    fn select_and_sign_ops_agree_between_widths() {
        let a = samples();
        let b: Vec<f32> = a.iter().rev().copied().collect();
        for i in 0..=a.len() - 4 {
            let va = f32x4::load(&a[i..]);
            let vb = f32x4::load(&b[i..]);
            let select = va.select_gt(vb, va, vb).to_array();
            let sign = va.xor_sign(vb).to_array();
            let negative = vb.if_negative(3.0).to_array();
            let min = Lane::min(va, vb).to_array();
            for k in 0..4 {
                let (sa, sb) = (a[i + k], b[i + k]);
                assert_eq!(select[k].to_bits(), sa.select_gt(sb, sa, sb).to_bits(), "i={i} k={k}");
                assert_eq!(sign[k].to_bits(), sa.xor_sign(sb).to_bits(), "i={i} k={k}");
                assert_eq!(negative[k].to_bits(), sb.if_negative(3.0).to_bits(), "i={i} k={k}");
                assert_eq!(min[k].to_bits(), Lane::min(sa, sb).to_bits(), "i={i} k={k}");
            }
        }
    }

    #[test]
    fn xor_sign_flips_on_negative_zero() {
        assert_eq!(2.0f32.xor_sign(-0.0), -2.0);
        assert_eq!(2.0f32.xor_sign(0.0), 2.0);
    }

    struct Hypot;
    impl BinaryKernel for Hypot {
        fn apply<L: Lane>(&self, a: L, b: L) -> L {
            (a * a + b * b).sqrt()
        }
    }

    #[test]
    fn map2_paths_are_bit_identical() {
        let a = samples();
        let b: Vec<f32> = a.iter().map(|v| v * 0.5 - 1.0).collect();
        let mut scalar = vec![0.0; a.len()];
        let mut vector = vec![0.0; a.len()];
        map2_with(VectorWidth::Scalar, &Hypot, &a, &b, &mut scalar);
        map2_with(VectorWidth::X4, &Hypot, &a, &b, &mut vector);
        for (s, v) in scalar.iter().zip(&vector) {
            assert_eq!(s.to_bits(), v.to_bits());
        }
    }
}
