//! Seeded random source with the declared per-family draws.
//!
//! Both the canonical samplers and the candidate samplers decoded from a
//! rendered artifact draw through [`SeededSource`]. Two sources built from the
//! same seed yield the same stream, so identical draw calls give bit-identical
//! output.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// A deterministic random source for one sampling path.
///
/// Sources are never shared: each case of the verification engine builds a
/// fresh one per path.
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: SmallRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// `size` binomial counts of `n` trials with success probability `p`.
    ///
    /// A trial succeeds iff its unit draw is `< p`, so `p = 0` never succeeds
    /// and `p = 1` always does.
    pub fn binomial(&mut self, n: u64, p: f64, size: usize) -> Vec<i64> {
        (0..size)
            .map(|_| {
                let mut successes = 0i64;
                for _ in 0..n {
                    if self.next_f64() < p {
                        successes += 1;
                    }
                }
                successes
            })
            .collect()
    }

    /// `size` draws from the half-open interval `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64, size: usize) -> Vec<f64> {
        (0..size).map(|_| self.uniform_half_open(low, high)).collect()
    }

    fn uniform_half_open(&mut self, low: f64, high: f64) -> f64 {
        loop {
            let value = lerp(low, high, self.next_f64());
            // Rounding can land exactly on `high`; redraw to keep the bound open.
            if value >= high && low < high {
                continue;
            }
            return if value < low { low } else { value };
        }
    }

    /// `size` normal draws with mean `loc` and standard deviation `scale`.
    pub fn normal(&mut self, loc: f64, scale: f64, size: usize) -> Vec<f64> {
        (0..size)
            .map(|_| loc + scale * self.standard_normal())
            .collect()
    }

    /// Box-Muller, one value per pair of unit draws.
    fn standard_normal(&mut self) -> f64 {
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Scalar draw from the closed interval `[low, high]`.
    ///
    /// Not clamped: extreme bounds may overflow and callers check finiteness.
    pub fn uniform_scalar(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

fn lerp(low: f64, high: f64, t: f64) -> f64 {
    let width = high - low;
    if width.is_finite() {
        low + width * t
    } else {
        low * (1.0 - t) + high * t
    }
}
