mod common;

use common::synthetic_image::{flat_f32, ramp_x_f32, textured_rgb_f32, vertical_step_f32};
use hog_features::features::compute_gradient_magnitude_with;
use hog_features::image::{ImageInput, PixelData};
use hog_features::prelude::*;
use hog_features::HogLayout;
use std::f32::consts::PI;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn uniform_gray_image_gives_all_zero_fhog() {
    init_logging();
    let img = flat_f32(64, 64, 0.5);
    let fhog = compute_fhog(&ImageInput::gray_f32(64, 64, &img), &FhogParams::new(4, 9)).unwrap();
    assert_eq!(fhog.shape(), [31, 16, 16]);
    assert!(fhog.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn channel_counts_for_nine_orientations() {
    let img = textured_rgb_f32(48, 40);
    let input = ImageInput::rgb_f32(48, 40, &img);
    assert_eq!(compute_hog(&input, &HogParams::new(8, 9)).unwrap().channels, 9);
    assert_eq!(compute_fhog(&input, &FhogParams::new(8, 9)).unwrap().channels, 31);
    let per = HogParams::new(8, 9).with_layout(HogLayout::PerNormalization);
    assert_eq!(compute_hog(&input, &per).unwrap().channels, 36);
}

#[test]
fn vertical_edge_lands_in_horizontal_gradient_bin() {
    init_logging();
    let (w, h) = (32, 32);
    let img = vertical_step_f32(w, h, 16);
    let hog = compute_hog(&ImageInput::gray_f32(w, h, &img), &HogParams::new(8, 4)).unwrap();
    assert_eq!(hog.shape(), [4, 4, 4]);
    for cy in 0..4 {
        for cx in 0..4 {
            let edge_column = cx == 1 || cx == 2;
            assert_eq!(hog.get(0, cx, cy) > 0.0, edge_column, "cell ({cx}, {cy})");
            for o in 1..4 {
                assert!(hog.get(o, cx, cy).abs() < 1e-6, "bin {o} cell ({cx}, {cy})");
            }
        }
    }
}

#[test]
fn ramp_has_constant_gradient_up_to_the_border() {
    let (w, h) = (40, 24);
    let img = ramp_x_f32(w, h, 0.01);
    let grad = compute_gradient_magnitude(&ImageInput::gray_f32(w, h, &img), false).unwrap();
    assert_eq!((grad.mag.w, grad.mag.h), (w, h));
    for y in 0..h {
        for x in 0..w {
            assert!((grad.mag.get(x, y) - 0.01).abs() < 1e-5, "({x}, {y})");
        }
    }
}

#[test]
fn orientation_range_follows_full_flag() {
    let img = textured_rgb_f32(33, 21);
    let input = ImageInput::rgb_f32(33, 21, &img);
    for (full, upper) in [(false, PI), (true, 2.0 * PI)] {
        let grad = compute_gradient_magnitude(&input, full).unwrap();
        assert!(grad.mag.data.iter().all(|&m| m >= 0.0 && m.is_finite()));
        assert!(grad.ori.data.iter().all(|&o| (0.0..upper).contains(&o)));
    }
}

#[test]
fn scalar_and_vector_widths_agree_end_to_end() {
    let (w, h) = (37, 29);
    let img = textured_rgb_f32(w, h);
    let input = ImageInput::rgb_f32(w, h, &img);
    for binning in [
        BinningPolicy::Nearest,
        BinningPolicy::Orientation,
        BinningPolicy::Spatial,
        BinningPolicy::Trilinear,
    ] {
        let scalar = FhogParams::new(4, 9)
            .with_binning(binning)
            .with_vector_width(VectorWidth::Scalar);
        let vector = scalar.with_vector_width(VectorWidth::X4);
        assert_eq!(
            compute_fhog(&input, &scalar).unwrap(),
            compute_fhog(&input, &vector).unwrap(),
            "{binning:?}"
        );
        let scalar = HogParams::new(5, 7)
            .with_binning(binning)
            .with_vector_width(VectorWidth::Scalar);
        let vector = scalar.with_vector_width(VectorWidth::X4);
        assert_eq!(
            compute_hog(&input, &scalar).unwrap(),
            compute_hog(&input, &vector).unwrap(),
            "{binning:?}"
        );
    }
    let a = compute_gradient_magnitude_with(&input, true, VectorWidth::Scalar).unwrap();
    let b = compute_gradient_magnitude_with(&input, true, VectorWidth::X4).unwrap();
    assert_eq!(a.mag, b.mag);
    assert_eq!(a.ori, b.ori);
}

#[test]
fn concurrent_calls_are_independent() {
    let (w, h) = (40, 32);
    let img = textured_rgb_f32(w, h);
    let input = ImageInput::rgb_f32(w, h, &img);
    let params = FhogParams::default();
    let expected = compute_fhog(&input, &params).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| compute_fhog(&input, &params))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
}

#[test]
fn unsupported_inputs_fail_before_computation() {
    let bytes = vec![0u8; 16 * 16];
    let u8_input = ImageInput {
        width: 16,
        height: 16,
        channels: 1,
        order: Default::default(),
        data: PixelData::U8(&bytes),
    };
    assert!(matches!(
        compute_fhog(&u8_input, &FhogParams::default()),
        Err(FeatureError::InvalidInputType { pixel: "u8", channels: 1 })
    ));

    let two = vec![0.0f32; 16 * 16 * 2];
    let two_channel = ImageInput {
        channels: 2,
        ..ImageInput::gray_f32(16, 16, &two)
    };
    assert!(matches!(
        compute_hog(&two_channel, &HogParams::new(4, 9)),
        Err(FeatureError::InvalidInputType { channels: 2, .. })
    ));

    let short = vec![0.0f32; 10];
    assert!(matches!(
        compute_fhog(&ImageInput::rgb_f32(16, 16, &short), &FhogParams::default()),
        Err(FeatureError::DimensionMismatch { .. })
    ));

    let ok = flat_f32(16, 16, 0.0);
    assert!(matches!(
        compute_hog(&ImageInput::gray_f32(16, 16, &ok), &HogParams::new(0, 9)),
        Err(FeatureError::InvalidParameter(_))
    ));
}
