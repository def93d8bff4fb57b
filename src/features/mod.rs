//! Feature extraction entry points.
//!
//! Each call runs the whole pipeline on one image:
//!
//! ```text
//! ImageInput ─► PlanarImage ─► gradients ─► histogram ─► block norms ─► channels
//! ```
//!
//! Inputs and parameters are validated up front; on error nothing is
//! written to a caller-provided tensor. Trailing pixels that do not fill a
//! whole cell are ignored, but at least one full cell is required in each
//! direction.
//!
//! ```
//! use hog_features::features::{compute_fhog, FhogParams};
//! use hog_features::image::ImageInput;
//!
//! let pixels = vec![0.5f32; 32 * 32];
//! let input = ImageInput::gray_f32(32, 32, &pixels);
//! let fhog = compute_fhog(&input, &FhogParams::new(4, 9)).unwrap();
//! assert_eq!(fhog.shape(), [31, 8, 8]);
//! ```
mod options;
mod tensor;

pub use options::{FhogParams, HogLayout, HogParams};
pub use tensor::FeatureTensor;

use crate::diagnostics::TimingBreakdown;
use crate::error::{FeatureError, Result};
use crate::gradient::{gradient_magnitude, GradientMagnitude};
use crate::hog::{assemble_channels, block_norms, gradient_histogram, ChannelMode, HistogramParams};
use crate::image::{ImageInput, PlanarImage};
use crate::lanes::VectorWidth;
use log::debug;
use std::time::Instant;

fn elapsed_ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

/// Cell grid covered by a `w × h` image.
fn cell_grid(w: usize, h: usize, bin_size: usize) -> Result<(usize, usize)> {
    let (cells_x, cells_y) = (w / bin_size, h / bin_size);
    if cells_x == 0 || cells_y == 0 {
        return Err(FeatureError::InvalidParameter(format!(
            "image {w}x{h} is smaller than one {bin_size}x{bin_size} cell"
        )));
    }
    Ok((cells_x, cells_y))
}

fn ensure_same_planes(grad: &GradientMagnitude) -> Result<()> {
    if (grad.mag.w, grad.mag.h) != (grad.ori.w, grad.ori.h) {
        return Err(FeatureError::DimensionMismatch {
            what: "orientation plane",
            expected: vec![grad.mag.h, grad.mag.w],
            actual: vec![grad.ori.h, grad.ori.w],
        });
    }
    Ok(())
}

/// Gradient magnitude and orientation of an `f32` gray or colour image.
///
/// Orientation covers `[0, 2π)` when `full` is set, `[0, π)` otherwise.
pub fn compute_gradient_magnitude(input: &ImageInput<'_>, full: bool) -> Result<GradientMagnitude> {
    compute_gradient_magnitude_with(input, full, VectorWidth::default())
}

/// [`compute_gradient_magnitude`] with an explicit kernel width.
pub fn compute_gradient_magnitude_with(
    input: &ImageInput<'_>,
    full: bool,
    width: VectorWidth,
) -> Result<GradientMagnitude> {
    let image = PlanarImage::from_input(input)?;
    let t = Instant::now();
    let grad = gradient_magnitude(&image, full, width);
    debug!(
        "gradient: {}x{}x{} full={} elapsed_ms={:.3}",
        image.w,
        image.h,
        image.channels,
        full,
        elapsed_ms(t)
    );
    Ok(grad)
}

// --- HOG -------------------------------------------------------------------

/// HOG tensor of `params.channel_count()` channels over the cell grid.
pub fn compute_hog(input: &ImageInput<'_>, params: &HogParams) -> Result<FeatureTensor> {
    compute_hog_with_timing(input, params).map(|(tensor, _)| tensor)
}

/// [`compute_hog`] plus per-stage timings.
pub fn compute_hog_with_timing(
    input: &ImageInput<'_>,
    params: &HogParams,
) -> Result<(FeatureTensor, TimingBreakdown)> {
    params.validate()?;
    let image = PlanarImage::from_input(input)?;
    let (cells_x, cells_y) = cell_grid(image.w, image.h, params.bin_size)?;
    let mut out = FeatureTensor::new(params.channel_count(), cells_x, cells_y);
    let timing = run_hog(&image, params, &mut out)?;
    Ok((out, timing))
}

/// Writes HOG features into `out`, which must already have the shape
/// `[params.channel_count(), cells_y, cells_x]`.
pub fn compute_hog_into(input: &ImageInput<'_>, params: &HogParams, out: &mut FeatureTensor) -> Result<()> {
    params.validate()?;
    let image = PlanarImage::from_input(input)?;
    let (cells_x, cells_y) = cell_grid(image.w, image.h, params.bin_size)?;
    out.ensure_shape([params.channel_count(), cells_y, cells_x])?;
    run_hog(&image, params, out).map(|_| ())
}

/// HOG features from precomputed gradients.
///
/// `grad.ori` must span the range matching `params.full`.
pub fn hog_from_gradients(grad: &GradientMagnitude, params: &HogParams) -> Result<FeatureTensor> {
    params.validate()?;
    ensure_same_planes(grad)?;
    let (cells_x, cells_y) = cell_grid(grad.mag.w, grad.mag.h, params.bin_size)?;
    let mut out = FeatureTensor::new(params.channel_count(), cells_x, cells_y);
    let mut timing = TimingBreakdown::default();
    hog_stages(grad, params, &mut out, &mut timing)?;
    Ok(out)
}

fn run_hog(image: &PlanarImage, params: &HogParams, out: &mut FeatureTensor) -> Result<TimingBreakdown> {
    let start = Instant::now();
    let mut timing = TimingBreakdown::default();

    let t = Instant::now();
    let grad = gradient_magnitude(&image, params.full, params.vector_width);
    timing.push("gradient", elapsed_ms(t));

    hog_stages(&grad, params, out, &mut timing)?;
    timing.total_ms = elapsed_ms(start);
    debug!(
        "HOG: {}x{} bin={} orients={} channels={} total_ms={:.3}",
        image.w,
        image.h,
        params.bin_size,
        params.n_orients,
        out.channels,
        timing.total_ms
    );
    Ok(timing)
}

fn hog_stages(
    grad: &GradientMagnitude,
    params: &HogParams,
    out: &mut FeatureTensor,
    timing: &mut TimingBreakdown,
) -> Result<()> {
    let t = Instant::now();
    let hist = gradient_histogram(
        &grad.mag,
        &grad.ori,
        &HistogramParams {
            bin_size: params.bin_size,
            n_orients: params.n_orients,
            full: params.full,
            binning: params.binning,
            vector_width: params.vector_width,
        },
    )?;
    timing.push("histogram", elapsed_ms(t));

    let t = Instant::now();
    let norms = block_norms(&hist, params.bin_size);
    timing.push("normalization", elapsed_ms(t));

    let t = Instant::now();
    let mode = match params.layout {
        HogLayout::Collapsed => ChannelMode::OrientationSum,
        HogLayout::PerNormalization => ChannelMode::PerNormalization,
    };
    out.data.fill(0.0);
    assemble_channels(&mut out.data, &hist, &norms, params.clip, mode);
    timing.push("channels", elapsed_ms(t));
    for stage in &timing.stages {
        debug!("HOG stage {}: elapsed_ms={:.3}", stage.label, stage.elapsed_ms);
    }
    Ok(())
}

// --- FHOG ------------------------------------------------------------------

/// FHOG tensor: `2n` contrast-sensitive, `n` contrast-insensitive and 4
/// texture channels (plus an optional zero channel).
pub fn compute_fhog(input: &ImageInput<'_>, params: &FhogParams) -> Result<FeatureTensor> {
    compute_fhog_with_timing(input, params).map(|(tensor, _)| tensor)
}

/// [`compute_fhog`] plus per-stage timings.
pub fn compute_fhog_with_timing(
    input: &ImageInput<'_>,
    params: &FhogParams,
) -> Result<(FeatureTensor, TimingBreakdown)> {
    params.validate()?;
    let image = PlanarImage::from_input(input)?;
    let (cells_x, cells_y) = cell_grid(image.w, image.h, params.bin_size)?;
    let mut out = FeatureTensor::new(params.channel_count(), cells_x, cells_y);
    let timing = run_fhog(&image, params, &mut out)?;
    Ok((out, timing))
}

/// Writes FHOG features into `out`, which must already have the shape
/// `[params.channel_count(), cells_y, cells_x]`.
pub fn compute_fhog_into(input: &ImageInput<'_>, params: &FhogParams, out: &mut FeatureTensor) -> Result<()> {
    params.validate()?;
    let image = PlanarImage::from_input(input)?;
    let (cells_x, cells_y) = cell_grid(image.w, image.h, params.bin_size)?;
    out.ensure_shape([params.channel_count(), cells_y, cells_x])?;
    run_fhog(&image, params, out).map(|_| ())
}

/// FHOG features from precomputed gradients with orientation in `[0, 2π)`.
pub fn fhog_from_gradients(grad: &GradientMagnitude, params: &FhogParams) -> Result<FeatureTensor> {
    params.validate()?;
    ensure_same_planes(grad)?;
    let (cells_x, cells_y) = cell_grid(grad.mag.w, grad.mag.h, params.bin_size)?;
    let mut out = FeatureTensor::new(params.channel_count(), cells_x, cells_y);
    let mut timing = TimingBreakdown::default();
    fhog_stages(grad, params, &mut out, &mut timing)?;
    Ok(out)
}

fn run_fhog(image: &PlanarImage, params: &FhogParams, out: &mut FeatureTensor) -> Result<TimingBreakdown> {
    let start = Instant::now();
    let mut timing = TimingBreakdown::default();

    let t = Instant::now();
    let grad = gradient_magnitude(&image, true, params.vector_width);
    timing.push("gradient", elapsed_ms(t));

    fhog_stages(&grad, params, out, &mut timing)?;
    timing.total_ms = elapsed_ms(start);
    debug!(
        "FHOG: {}x{} bin={} orients={} channels={} total_ms={:.3}",
        image.w,
        image.h,
        params.bin_size,
        params.n_orients,
        out.channels,
        timing.total_ms
    );
    Ok(timing)
}

fn fhog_stages(
    grad: &GradientMagnitude,
    params: &FhogParams,
    out: &mut FeatureTensor,
    timing: &mut TimingBreakdown,
) -> Result<()> {
    let n = params.n_orients;

    let t = Instant::now();
    let sensitive = gradient_histogram(
        &grad.mag,
        &grad.ori,
        &HistogramParams {
            bin_size: params.bin_size,
            n_orients: 2 * n,
            full: true,
            binning: params.binning,
            vector_width: params.vector_width,
        },
    )?;
    let insensitive = sensitive.fold_antipodal();
    timing.push("histogram", elapsed_ms(t));

    let t = Instant::now();
    let norms = block_norms(&insensitive, params.bin_size);
    timing.push("normalization", elapsed_ms(t));

    let t = Instant::now();
    let plane = sensitive.plane_len();
    out.data.fill(0.0);
    let (sensitive_out, rest) = out.data.split_at_mut(2 * n * plane);
    let (insensitive_out, rest) = rest.split_at_mut(n * plane);
    let texture_out = &mut rest[..4 * plane];
    assemble_channels(sensitive_out, &sensitive, &norms, params.clip, ChannelMode::OrientationSum);
    assemble_channels(insensitive_out, &insensitive, &norms, params.clip, ChannelMode::OrientationSum);
    assemble_channels(texture_out, &sensitive, &norms, params.clip, ChannelMode::Texture);
    timing.push("channels", elapsed_ms(t));
    for stage in &timing.stages {
        debug!("FHOG stage {}: elapsed_ms={:.3}", stage.label, stage.elapsed_ms);
    }
    Ok(())
}
