//! Deterministic seeded pseudo-random number generator
//!
//! Implements mulberry32 (Ettinger): a 32-bit counter-like state advanced by a
//! fixed odd constant per draw, followed by a fixed XOR/shift/multiply mixing
//! sequence over wrapping u32 arithmetic. One float in [0, 1) per call.
//!
//! This is the sole source of randomness for theme generation. Two generators
//! created with the same seed produce identical, infinite, reproducible
//! sequences — there is no external entropy anywhere. Not cryptographically
//! secure, by design: reproducibility is the point, unpredictability is not.

use serde::{Deserialize, Serialize};

/// Additive constant applied to the state before mixing (odd-biased)
const STATE_INCREMENT: u32 = 0x6D2B_79F5;

/// Mulberry32 PRNG — the theme generator's sole source of randomness.
///
/// The N-th output is a pure function of the seed; the draw order inside the
/// theme generator is therefore significant and fixed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a new generator from a 32-bit seed.
    ///
    /// Two generators created with the same seed produce identical output
    /// sequences.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return the next mixed 32-bit word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate a uniform `f64` in [0, 1).
    ///
    /// The mixed word divided by 2^32 — exact in an f64 mantissa, so the float
    /// stream is as reproducible as the integer stream underneath it.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}
