//! Randomness used to synthesize bar content.
//!
//! The generator only needs two draws: a uniform float in a closed range and a
//! uniform integer in a closed range. [`RngSource`] adapts any `rand` RNG to
//! that interface; seed it with [`RngSource::seeded`] for reproducible output.

use rand::{Rng, SeedableRng, rngs::StdRng};

pub trait RandomSource {
    /// Uniform draw from `[low, high]`. Requires `low <= high`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform draw from `[low, high]`, both ends inclusive. Requires `low <= high`.
    fn uniform_int(&mut self, low: u64, high: u64) -> u64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }

    fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
        (**self).uniform_int(low, high)
    }
}

/// [`RandomSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic source: the same seed always yields the same series.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.random_range(low..=high)
    }

    fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
        self.rng.random_range(low..=high)
    }
}
