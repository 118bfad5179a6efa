use bitvec::prelude::*;
use std::fmt;

/// Monotonic per-pixel fill flags
///
/// Bits are only ever set, never cleared, so the filled count is
/// non-decreasing over a run.
#[derive(Clone, Debug)]
pub struct FilledMask {
    bits: BitVec,
    filled: usize,
}

impl FilledMask {
    /// Create a mask with every cell unfilled
    pub fn new(cells: usize) -> Self {
        Self {
            bits: bitvec![0; cells],
            filled: 0,
        }
    }

    /// Mark a cell filled
    ///
    /// Returns `true` when the cell was previously unfilled
    pub fn fill(&mut self, index: usize) -> bool {
        if index >= self.bits.len() || self.is_filled(index) {
            return false;
        }
        self.bits.set(index, true);
        self.filled += 1;
        true
    }

    /// Test whether a cell is filled; out-of-range cells read as unfilled
    pub fn is_filled(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Number of filled cells
    pub const fn filled(&self) -> usize {
        self.filled
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Test if the mask covers no cells
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Test if every cell is filled
    pub fn is_full(&self) -> bool {
        self.bits.all()
    }

    /// Indices of all filled cells in row-major order
    pub fn filled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}

impl fmt::Display for FilledMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilledMask({}/{} filled)", self.filled, self.len())
    }
}
