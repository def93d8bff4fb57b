//! Channel-major working layout.
//!
//! `PlanarImage` stores `channels` contiguous row-major planes. Colour input
//! is always reordered to R, G, B so that the winner-take-all channel
//! selection breaks ties the same way regardless of the caller's layout.
use super::input::{ChannelOrder, ImageInput, PixelData};
use super::traits::ImageView;
use super::ImageF32;
use crate::error::{FeatureError, Result};

#[derive(Clone, Debug)]
pub struct PlanarImage {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    data: Vec<f32>,
}

/// Borrowed single channel of a [`PlanarImage`].
#[derive(Clone, Copy, Debug)]
pub struct PlaneRef<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [f32],
}

impl PlanarImage {
    /// Validate an interleaved caller image and transpose it into planes.
    pub fn from_input(input: &ImageInput<'_>) -> Result<Self> {
        let data = match input.data {
            PixelData::F32(data) if input.channels == 1 || input.channels == 3 => data,
            other => {
                return Err(FeatureError::InvalidInputType {
                    pixel: other.type_name(),
                    channels: input.channels,
                })
            }
        };
        let (w, h, d) = (input.width, input.height, input.channels);
        let expected_len = w.checked_mul(h).and_then(|n| n.checked_mul(d));
        if expected_len != Some(data.len()) {
            return Err(FeatureError::DimensionMismatch {
                what: "input pixel buffer",
                expected: vec![h, w, d],
                actual: vec![data.len()],
            });
        }

        let plane_len = w * h;
        let mut planes = vec![0.0f32; plane_len * d];
        for (i, px) in data.chunks_exact(d).enumerate() {
            for (c, &v) in px.iter().enumerate() {
                let dst = match input.order {
                    ChannelOrder::Rgb => c,
                    ChannelOrder::Bgr => d - 1 - c,
                };
                planes[dst * plane_len + i] = v;
            }
        }
        Ok(Self {
            w,
            h,
            channels: d,
            data: planes,
        })
    }

    pub fn from_plane(plane: ImageF32) -> Self {
        Self {
            w: plane.w,
            h: plane.h,
            channels: 1,
            data: plane.data,
        }
    }

    pub fn channel(&self, c: usize) -> PlaneRef<'_> {
        let len = self.w * self.h;
        PlaneRef {
            w: self.w,
            h: self.h,
            data: &self.data[c * len..(c + 1) * len],
        }
    }
}

impl<'a> ImageView for PlaneRef<'a> {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        Some(self.data)
    }
}
