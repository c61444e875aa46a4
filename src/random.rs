// Random Source Module
// Injectable randomness so timing calculations can be made deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed numbers in `[0, 1)`
pub trait RandomSource: Send {
    /// Next sample in `[0, 1)`
    fn next(&mut self) -> f64;

    /// Uniform sample in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next() * (high - low)
    }

    /// Bernoulli trial that succeeds with `probability`
    fn chance(&mut self, probability: f64) -> bool {
        self.next() < probability
    }
}

/// Random source backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl ThreadRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRandom {
    fn next(&mut self) -> f64 {
        rand::rng().random()
    }
}

/// Reproducible random source seeded from a `u64`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self) -> f64 {
        self.rng.random()
    }
}

/// Always yields the same value (clamped into `[0, 1)`)
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom {
    value: f64,
}

impl ConstantRandom {
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0 - f64::EPSILON),
        }
    }
}

impl RandomSource for ConstantRandom {
    fn next(&mut self) -> f64 {
        self.value
    }
}

/// Build a boxed source: seeded when a seed is given, thread RNG otherwise
pub fn source_from_seed(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom::new()),
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next(&mut self) -> f64 {
        (**self).next()
    }
}
