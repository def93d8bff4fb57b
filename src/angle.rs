//! Orientation lookup: a process-wide arc-cosine table.
//!
//! The table maps `i ∈ [-(N + M), N + M)` to `acos(i / N)` with `N = 10_000`
//! steps per unit and a margin of `M = 10` entries on each side (π below
//! −1, 0 above +1). Entries are clamped to `π − 1e-6` so that an orientation
//! scaled back into bins never truncates onto the wrap-around bin.
//!
//! The table is built once behind a `OnceLock` and is read-only afterwards.
use std::f32::consts::PI;
use std::sync::OnceLock;

/// Table steps per unit cosine.
pub const ACOS_STEPS: usize = 10_000;
/// Extra entries on each side absorbing rounding past ±1.
pub const ACOS_MARGIN: usize = 10;
/// Largest orientation the table returns.
pub const MAX_ORIENTATION: f32 = PI - 1e-6;

pub struct AcosTable {
    values: Vec<f32>,
}

static TABLE: OnceLock<AcosTable> = OnceLock::new();

impl AcosTable {
    /// Shared table, built on first use.
    pub fn get() -> &'static AcosTable {
        TABLE.get_or_init(AcosTable::build)
    }

    fn build() -> Self {
        let n = ACOS_STEPS as i32;
        let b = ACOS_MARGIN as i32;
        let values = (-n - b..n + b)
            .map(|i| {
                let v = if i < -n {
                    PI
                } else if i < n {
                    f64::from(i as f32 / n as f32).acos() as f32
                } else {
                    0.0
                };
                v.min(MAX_ORIENTATION)
            })
            .collect();
        Self { values }
    }

    /// Scale applied to a unit cosine before [`AcosTable::lookup`].
    #[inline]
    pub fn scale(&self) -> f32 {
        ACOS_STEPS as f32
    }

    /// Angle for a cosine already multiplied by [`AcosTable::scale`].
    ///
    /// The argument is truncated toward zero, like an integer cast; values
    /// past the margins saturate.
    #[inline]
    pub fn lookup(&self, scaled_cos: f32) -> f32 {
        let offset = (ACOS_STEPS + ACOS_MARGIN) as i64;
        let i = (scaled_cos as i64 + offset).clamp(0, self.values.len() as i64 - 1);
        self.values[i as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
