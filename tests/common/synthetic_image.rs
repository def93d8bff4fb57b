/// Constant gray image.
pub fn flat_f32(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Horizontal ramp `I(x, y) = slope * x`.
pub fn ramp_x_f32(width: usize, height: usize, slope: f32) -> Vec<f32> {
    let mut img = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            img[y * width + x] = slope * x as f32;
        }
    }
    img
}

/// Dark left half, bright right half, the step between `column - 1` and
/// `column`.
pub fn vertical_step_f32(width: usize, height: usize, column: usize) -> Vec<f32> {
    assert!(column > 0 && column < width, "step column must be interior");
    let mut img = vec![0.0f32; width * height];
    for y in 0..height {
        for x in column..width {
            img[y * width + x] = 1.0;
        }
    }
    img
}

/// Deterministic interleaved RGB texture in [0, 1].
pub fn textured_rgb_f32(width: usize, height: usize) -> Vec<f32> {
    let mut img = vec![0.0f32; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let px = &mut img[(y * width + x) * 3..][..3];
            px[0] = ((x * 7 + y * 3) % 13) as f32 / 13.0;
            px[1] = if (x / 4 + y / 4) % 2 == 0 { 0.8 } else { 0.2 };
            px[2] = ((x * x + 5 * y) % 17) as f32 / 17.0;
        }
    }
    img
}
