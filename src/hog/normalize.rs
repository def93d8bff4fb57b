//! 2×2 block energy norms on a padded cell grid.
//!
//! For a histogram of `cells_x × cells_y` cells the norm map has
//! `(cells_x + 1) × (cells_y + 1)` entries. Entry `(px, py)` describes the
//! block of cells `{px − 1, px} × {py − 1, py}`:
//!
//! ```text
//! n(px, py) = 1 / sqrt(Σ_block Σ_o H[o]² + ε)
//! ```
//!
//! Only blocks made of four existing cells are evaluated; the outer ring of
//! the padded map replicates the nearest evaluated entry (edges and corners
//! alike). Grids narrower than two cells evaluate the one block that exists,
//! restricted to the cells present.
use super::histogram::Histogram;

/// Padded inverse block norms, row-major over `(cells_y + 1) × (cells_x + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct NormMap {
    pub cells_x: usize,
    pub cells_y: usize,
    pub data: Vec<f32>,
}

impl NormMap {
    #[inline]
    pub fn padded_width(&self) -> usize {
        self.cells_x + 1
    }

    #[inline]
    pub fn padded_height(&self) -> usize {
        self.cells_y + 1
    }

    /// Entry at padded coordinates, `0 <= px <= cells_x`, `0 <= py <= cells_y`.
    #[inline]
    pub fn get(&self, px: usize, py: usize) -> f32 {
        self.data[py * self.padded_width() + px]
    }
}

/// Regularizer added to every block energy.
///
/// Scaled by `1 / (4 · bin⁴)` because cell values are averages over
/// `bin²` pixels.
pub fn norm_epsilon(bin_size: usize) -> f32 {
    let b = bin_size as f32;
    1e-4 / 4.0 / b / b / b / b
}

/// Block norms of `hist`, with cells of `bin_size` pixels.
pub fn block_norms(hist: &Histogram, bin_size: usize) -> NormMap {
    let (wb, hb) = (hist.cells_x, hist.cells_y);
    let eps = norm_epsilon(bin_size);

    let mut energy = vec![0.0f32; wb * hb];
    for o in 0..hist.n_orients {
        for (e, &v) in energy.iter_mut().zip(hist.plane(o)) {
            *e += v * v;
        }
    }
    let cell = |cx: usize, cy: usize| -> f32 {
        if cx < wb && cy < hb {
            energy[cy * wb + cx]
        } else {
            0.0
        }
    };

    // Evaluated blocks, indexed from padded coordinate 1.
    let (iw, ih) = (wb.saturating_sub(1).max(1), hb.saturating_sub(1).max(1));
    let mut inner = vec![0.0f32; iw * ih];
    for iy in 0..ih {
        for ix in 0..iw {
            let s = cell(ix, iy) + cell(ix, iy + 1) + cell(ix + 1, iy) + cell(ix + 1, iy + 1);
            inner[iy * iw + ix] = 1.0 / (s + eps).sqrt();
        }
    }

    let (pw, ph) = (wb + 1, hb + 1);
    let mut data = vec![0.0f32; pw * ph];
    for py in 0..ph {
        let iy = py.clamp(1, ih) - 1;
        for px in 0..pw {
            let ix = px.clamp(1, iw) - 1;
            data[py * pw + px] = inner[iy * iw + ix];
        }
    }

    NormMap {
        cells_x: wb,
        cells_y: hb,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5 * a.abs().max(b.abs()).max(1.0)
    }

    fn hist_from_cells(cells_x: usize, cells_y: usize, f: impl Fn(usize, usize) -> f32) -> Histogram {
        let mut h = Histogram::zeros(1, cells_x, cells_y);
        for cy in 0..cells_y {
            for cx in 0..cells_x {
                let i = h.idx(0, cx, cy);
                h.data[i] = f(cx, cy);
            }
        }
        h
    }

    #[test]
    fn epsilon_scales_with_bin_size() {
        assert!(approx_eq(norm_epsilon(1), 2.5e-5));
        assert!(approx_eq(norm_epsilon(2) * 16.0, norm_epsilon(1)));
    }

    #[test]
    fn interior_entries_use_their_2x2_block() {
        let hist = hist_from_cells(4, 3, |cx, cy| (1 + cx + 4 * cy) as f32);
        let n = block_norms(&hist, 1);
        assert_eq!((n.padded_width(), n.padded_height()), (5, 4));
        // block {0,1} x {0,1}: values 1, 2, 5, 6
        let expected = 1.0 / (1.0f32 + 4.0 + 25.0 + 36.0 + norm_epsilon(1)).sqrt();
        assert!(approx_eq(n.get(1, 1), expected));
        // block {2,3} x {1,2}: values 7, 8, 11, 12
        let expected = 1.0 / (49.0f32 + 64.0 + 121.0 + 144.0 + norm_epsilon(1)).sqrt();
        assert!(approx_eq(n.get(3, 2), expected));
    }

    #[test]
    fn padding_replicates_nearest_interior_entry() {
        let hist = hist_from_cells(4, 3, |cx, cy| 0.1 * (1 + cx * 3 + cy) as f32);
        let n = block_norms(&hist, 2);
        let (pw, ph) = (n.padded_width(), n.padded_height());
        for py in 0..ph {
            for px in 0..pw {
                let src = (px.clamp(1, pw - 2), py.clamp(1, ph - 2));
                assert_eq!(n.get(px, py), n.get(src.0, src.1), "({px}, {py})");
            }
        }
        // corners taken diagonally, independent of edge order
        assert_eq!(n.get(0, 0), n.get(1, 1));
        assert_eq!(n.get(pw - 1, 0), n.get(pw - 2, 1));
        assert_eq!(n.get(0, ph - 1), n.get(1, ph - 2));
        assert_eq!(n.get(pw - 1, ph - 1), n.get(pw - 2, ph - 2));
    }

    #[test]
    fn zero_histogram_gives_finite_norms() {
        let hist = Histogram::zeros(9, 5, 5);
        let n = block_norms(&hist, 4);
        let expected = 1.0 / norm_epsilon(4).sqrt();
        assert!(n.data.iter().all(|&v| v.is_finite() && approx_eq(v, expected)));
    }

    #[test]
    fn single_cell_grid_is_fully_defined() {
        let hist = hist_from_cells(1, 3, |_, cy| cy as f32 + 1.0);
        let n = block_norms(&hist, 1);
        assert_eq!(n.data.len(), 2 * 4);
        assert!(n.data.iter().all(|v| v.is_finite() && *v > 0.0));
        // column strip: block rows {0,1} -> 1 + 4
        let expected = 1.0 / (5.0f32 + norm_epsilon(1)).sqrt();
        assert!(approx_eq(n.get(0, 0), expected));
    }
}
