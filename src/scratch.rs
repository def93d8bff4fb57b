//! Per-call scratch buffers with a guaranteed 16-byte alignment.
//!
//! Storage is a `Vec<f32x4>`, so every buffer starts on a vector boundary and
//! its capacity is padded to a whole number of lanes. Kernels receive plain
//! `&[f32]` / `&mut [f32]` views; the padding tail is zero and never read
//! back by callers. Buffers are handed out by a [`ScratchArena`] and dropped
//! at the end of the extraction call that requested them.
use wide::f32x4;

const LANE: usize = 4;

#[derive(Clone, Debug)]
pub struct AlignedBuf {
    lanes: Vec<f32x4>,
    len: usize,
}

impl AlignedBuf {
    pub fn zeroed(len: usize) -> Self {
        let lanes = vec![f32x4::ZERO; len.div_ceil(LANE)];
        let buf = Self { lanes, len };
        debug_assert_eq!(buf.as_padded().as_ptr() as usize % 16, 0);
        buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.as_padded()[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        let len = self.len;
        &mut self.as_padded_mut()[..len]
    }

    /// Whole backing store, length rounded up to a multiple of four.
    #[inline]
    pub fn as_padded(&self) -> &[f32] {
        bytemuck::cast_slice(&self.lanes)
    }

    #[inline]
    pub fn as_padded_mut(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(&mut self.lanes)
    }
}

/// Source of the zeroed, aligned temporaries used by one extraction call.
/// Buffers are owned by the caller that requested them and dropped with it.
#[derive(Debug, Default)]
pub struct ScratchArena;

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zeroed float buffer of `len` values.
    pub fn floats(&mut self, len: usize) -> AlignedBuf {
        AlignedBuf::zeroed(len)
    }

    /// A zeroed index buffer of `len` entries.
    pub fn indices(&mut self, len: usize) -> Vec<usize> {
        vec![0; len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_padded_and_aligned() {
        let mut arena = ScratchArena::new();
        let mut buf = arena.floats(7);
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.as_padded().len(), 8);
        assert_eq!(buf.as_slice().as_ptr() as usize % 16, 0);
        buf.as_mut_slice()[6] = 2.0;
        assert_eq!(buf.as_slice()[6], 2.0);
        assert_eq!(buf.as_padded()[7], 0.0);
        assert_eq!(arena.indices(3), vec![0; 3]);
    }
}
