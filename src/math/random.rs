//! Seeded 32-bit mixing generator for reproducible palettes and jitter
//!
//! Mulberry32: one 32-bit word of state, advanced by a Weyl constant and
//! scrambled with xor-shift multiplies. Identical seeds give identical
//! streams on every platform.

use rand::rand_core::{RngCore, SeedableRng, impls};

const WEYL_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic random stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a stream from a signed 32-bit seed
    pub const fn new(seed: i32) -> Self {
        Self {
            state: seed as u32,
        }
    }

    /// Advance the state and return the next raw 32-bit output
    pub const fn next_word(&mut self) -> u32 {
        self.state = self.state.wrapping_add(WEYL_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value uniformly distributed in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_word()) / TWO_POW_32
    }

    /// Uniform index in `0..len`, or 0 when `len` is 0
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Symmetric jitter in `[-span / 2, span / 2)`
    pub fn jitter(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }

    /// Fisher-Yates shuffle driven by this stream
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i32::from_le_bytes(seed))
    }
}
