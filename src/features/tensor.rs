//! Channel-major feature tensor returned by the extractors.
use crate::error::{FeatureError, Result};
use crate::image::ImageF32;

/// Per-cell features stored as `channels` planes of `cells_y × cells_x`
/// values (`[channel][cy][cx]`).
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureTensor {
    pub channels: usize,
    pub cells_x: usize,
    pub cells_y: usize,
    pub data: Vec<f32>,
}

impl FeatureTensor {
    /// Zero-filled tensor.
    pub fn new(channels: usize, cells_x: usize, cells_y: usize) -> Self {
        Self {
            channels,
            cells_x,
            cells_y,
            data: vec![0.0; channels * cells_x * cells_y],
        }
    }

    /// `[channels, cells_y, cells_x]`
    pub fn shape(&self) -> [usize; 3] {
        [self.channels, self.cells_y, self.cells_x]
    }

    #[inline]
    pub fn plane_len(&self) -> usize {
        self.cells_x * self.cells_y
    }

    #[inline]
    pub fn get(&self, c: usize, cx: usize, cy: usize) -> f32 {
        self.data[c * self.plane_len() + cy * self.cells_x + cx]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn channel_slice(&self, c: usize) -> &[f32] {
        let len = self.plane_len();
        &self.data[c * len..(c + 1) * len]
    }

    /// One channel copied out as a plane of `cells_x × cells_y`.
    pub fn channel(&self, c: usize) -> ImageF32 {
        ImageF32 {
            w: self.cells_x,
            h: self.cells_y,
            data: self.channel_slice(c).to_vec(),
        }
    }

    /// Cell-major copy, `[cy][cx][channel]`, the layout interleaved image
    /// containers use.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let plane = self.plane_len();
        let mut out = vec![0.0; self.data.len()];
        for c in 0..self.channels {
            for (cell, &v) in self.data[c * plane..(c + 1) * plane].iter().enumerate() {
                out[cell * self.channels + c] = v;
            }
        }
        out
    }

    /// Fails with `DimensionMismatch` unless the tensor has `expected` shape.
    pub(crate) fn ensure_shape(&self, expected: [usize; 3]) -> Result<()> {
        let actual = self.shape();
        if actual != expected || self.data.len() != expected.iter().product::<usize>() {
            return Err(FeatureError::DimensionMismatch {
                what: "feature tensor",
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}
