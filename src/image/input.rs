//! Caller-facing image description: interleaved pixels of some scalar type.
//!
//! The extractors only compute on `f32` data with one or three channels.
//! Other representations can still be described so that the rejection
//! happens in one place, before any work is done.
use super::ImageF32;

/// Borrowed interleaved pixel storage, `width * height * channels` values.
#[derive(Clone, Copy, Debug)]
pub enum PixelData<'a> {
    F32(&'a [f32]),
    U8(&'a [u8]),
    U16(&'a [u16]),
}

impl<'a> PixelData<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            PixelData::F32(_) => "f32",
            PixelData::U8(_) => "u8",
            PixelData::U16(_) => "u16",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PixelData::F32(d) => d.len(),
            PixelData::U8(d) => d.len(),
            PixelData::U16(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Order of the colour samples inside one interleaved pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Interleaved (`[y][x][channel]`) image borrowed from the caller.
#[derive(Clone, Copy, Debug)]
pub struct ImageInput<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub order: ChannelOrder,
    pub data: PixelData<'a>,
}

impl<'a> ImageInput<'a> {
    pub fn gray_f32(width: usize, height: usize, data: &'a [f32]) -> Self {
        Self {
            width,
            height,
            channels: 1,
            order: ChannelOrder::Rgb,
            data: PixelData::F32(data),
        }
    }

    pub fn rgb_f32(width: usize, height: usize, data: &'a [f32]) -> Self {
        Self {
            width,
            height,
            channels: 3,
            order: ChannelOrder::Rgb,
            data: PixelData::F32(data),
        }
    }

    /// Three-channel input stored blue first, as most capture libraries do.
    pub fn bgr_f32(width: usize, height: usize, data: &'a [f32]) -> Self {
        Self {
            order: ChannelOrder::Bgr,
            ..Self::rgb_f32(width, height, data)
        }
    }

    pub fn gray_u8(width: usize, height: usize, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            channels: 1,
            order: ChannelOrder::Rgb,
            data: PixelData::U8(data),
        }
    }

    /// View a single-channel plane as an input image.
    pub fn from_plane(plane: &'a ImageF32) -> Self {
        Self::gray_f32(plane.w, plane.h, &plane.data)
    }
}
