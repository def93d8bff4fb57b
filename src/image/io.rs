//! File helpers for the extraction tool.
//!
//! - `load_image_f32`: decode a PNG/JPEG into interleaved `f32` samples in [0, 1].
//! - `save_channel_png`: write one feature or gradient plane as an 8-bit PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageInput, ImageView};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned interleaved float image decoded from disk.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl LoadedImage {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Borrow as an interleaved RGB or gray input.
    pub fn as_input(&self) -> ImageInput<'_> {
        if self.channels == 3 {
            ImageInput::rgb_f32(self.width, self.height, &self.data)
        } else {
            ImageInput::gray_f32(self.width, self.height, &self.data)
        }
    }
}

/// Load an image from disk as gray (`color == false`) or RGB float samples.
pub fn load_image_f32(path: &Path, color: bool) -> Result<LoadedImage, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (channels, data) = if color {
        (3, img.to_rgb32f().into_raw())
    } else {
        (1, img.to_luma32f().into_raw())
    };
    Ok(LoadedImage {
        width,
        height,
        channels,
        data,
    })
}

/// Save a plane to a grayscale PNG, stretching `[0, max]` to `[0, 255]`.
///
/// An all-zero plane is written black.
pub fn save_channel_png(plane: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let max = plane.max_value();
    let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
    let mut out = GrayImage::new(plane.w as u32, plane.h as u32);
    for (y, row) in plane.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            let px = (v * scale).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([px as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
