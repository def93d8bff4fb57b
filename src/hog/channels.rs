//! Clipped block-normalized responses assembled into output channels.
//!
//! Each cell is normalized by the four blocks it belongs to. In padded norm
//! coordinates these are, in channel order, the blocks at
//! `(cx+1, cy+1)`, `(cx+1, cy)`, `(cx, cy+1)` and `(cx, cy)`. Every
//! normalized value is clipped to `clip` before it is stored or summed.
use super::histogram::Histogram;
use super::normalize::NormMap;

/// Empirical weight of the FHOG texture-energy channels.
pub const FHOG_TEXTURE_SCALE: f32 = 0.2357;

/// Weight of each normalization when summed into one orientation channel.
const ORIENTATION_SUM_WEIGHT: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelMode {
    /// `4 * n_orients` channels: normalization-major, then orientation.
    PerNormalization,
    /// `n_orients` channels: the four normalizations summed with weight 0.5.
    OrientationSum,
    /// 4 channels: one per normalization, summed over all orientations and
    /// scaled by [`FHOG_TEXTURE_SCALE`].
    Texture,
}

impl ChannelMode {
    pub fn channel_count(self, n_orients: usize) -> usize {
        match self {
            ChannelMode::PerNormalization => 4 * n_orients,
            ChannelMode::OrientationSum => n_orients,
            ChannelMode::Texture => 4,
        }
    }
}

/// Writes (or, for the summing modes, accumulates) the channels of `hist`
/// into `out`, which holds `mode.channel_count(n_orients)` planes of
/// `cells_y × cells_x` values.
///
/// `out` must be zeroed beforehand for the summing modes.
pub fn assemble_channels(out: &mut [f32], hist: &Histogram, norms: &NormMap, clip: f32, mode: ChannelMode) {
    let (wb, hb) = (hist.cells_x, hist.cells_y);
    let plane = wb * hb;
    debug_assert_eq!((norms.cells_x, norms.cells_y), (wb, hb));
    debug_assert!(out.len() >= mode.channel_count(hist.n_orients) * plane);

    let n_orients = hist.n_orients;
    for o in 0..n_orients {
        let src = hist.plane(o);
        for cy in 0..hb {
            for cx in 0..wb {
                let cell = cy * wb + cx;
                let r = src[cell];
                let blocks = [
                    norms.get(cx + 1, cy + 1),
                    norms.get(cx + 1, cy),
                    norms.get(cx, cy + 1),
                    norms.get(cx, cy),
                ];
                for (c, n) in blocks.into_iter().enumerate() {
                    let mut t = r * n;
                    if t > clip {
                        t = clip;
                    }
                    match mode {
                        ChannelMode::PerNormalization => {
                            out[(c * n_orients + o) * plane + cell] = t;
                        }
                        ChannelMode::OrientationSum => {
                            out[o * plane + cell] += t * ORIENTATION_SUM_WEIGHT;
                        }
                        ChannelMode::Texture => {
                            out[c * plane + cell] += t * FHOG_TEXTURE_SCALE;
                        }
                    }
                }
            }
        }
    }
}
