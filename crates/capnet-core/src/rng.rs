//! Deterministic RNG wrapper for reproducible builds and service generation.
//!
//! Every component that needs randomness (connection-builder jitter, Stage-B
//! endpoint sampling, Dijkstra tie-breaking noise) receives an explicit
//! `NetRng` instance seeded by the caller — never ambient global state.  The
//! same seed and inputs therefore always reproduce the same topology and the
//! same service set.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Explicitly seeded PRNG for one build or generation run.
pub struct NetRng(SmallRng);

impl NetRng {
    pub fn new(seed: u64) -> Self {
        NetRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `NetRng` with a different seed offset — lets one master
    /// seed drive independent streams (e.g. builder vs. service generator).
    pub fn child(&mut self, offset: u64) -> NetRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        NetRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform noise in `[-delta, +delta]`.  Returns 0.0 when `delta` is 0
    /// so a zero-noise configuration is exactly deterministic.
    #[inline]
    pub fn jitter(&mut self, delta: f64) -> f64 {
        if delta == 0.0 {
            0.0
        } else {
            self.0.gen_range(-delta..=delta)
        }
    }

    /// Choose a random element from a non-empty slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Sample an index in `0..weights.len()` with probability proportional to
    /// `weights[i]`.  Non-finite or negative weights count as zero; returns
    /// `None` if every weight is zero or the slice is empty.
    pub fn sample_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights
            .iter()
            .filter(|w| w.is_finite() && **w > 0.0)
            .sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = self.0.gen_range(0.0..total);
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w <= 0.0 {
                continue;
            }
            if target < w {
                return Some(i);
            }
            target -= w;
        }
        // Floating-point accumulation can land exactly on `total`.
        weights
            .iter()
            .rposition(|w| w.is_finite() && *w > 0.0)
    }
}
