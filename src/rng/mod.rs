//! Seeded stream — the deterministic draw source behind cow generation and
//! per-cow behavior.
//!
//! A 32-bit linear congruential generator: `state = state * 1664525 + 1013904223
//! (mod 2^32)`, each draw returning `state / 2^32`. Given the same seed the
//! sequence is bit-for-bit identical on every platform, which is what makes a
//! cow's appearance reproducible from its seed.

use serde::{Deserialize, Serialize};

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

/// Stateful generator of floats in [0, 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededStream {
    state: u32,
}

impl SeededStream {
    /// Only the low 32 bits of the seed matter: `(seed * a + c) mod 2^32`
    /// depends on `seed mod 2^32` alone.
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed & 0xFFFF_FFFF) as u32,
        }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state as f64 / MODULUS
    }

    pub fn next_f32(&mut self) -> f32 {
        self.next_f64() as f32
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Weighted categorical draw: one draw scanned against the cumulative
    /// normalized weights. Float rounding can leave the final cumulative value
    /// a hair under 1.0, so the last entry is the fallback.
    pub fn pick_weighted<T: Copy>(&mut self, table: &[(T, u32)]) -> Option<T> {
        let total: u32 = table.iter().map(|(_, w)| *w).sum();
        if total == 0 {
            return None;
        }
        let roll = self.next_f64();
        let mut cumulative = 0.0;
        for (value, weight) in table {
            cumulative += *weight as f64 / total as f64;
            if roll <= cumulative {
                return Some(*value);
            }
        }
        table.last().map(|(value, _)| *value)
    }
}

/// Round to two decimal places, the precision stats are stored at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
