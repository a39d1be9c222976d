//! Random sources for surge, ETA jitter and simulated pickup distance.
//!
//! The engine never reaches for a global RNG; every randomized quantity is
//! drawn from a [`RandomSource`] handed in by the owner, so tests can pin
//! the values and simulations can be replayed from a seed.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Uniform sampler shared across threads.
pub trait RandomSource: Send + Sync + std::fmt::Debug {
    /// Sample uniformly from `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&self, low: f64, high: f64) -> f64;
}

/// Thread-local entropy; values are reproducible only in distribution.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..high)
    }
}

/// Seeded `StdRng` behind a mutex so a whole run can be replayed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(low..high)
    }
}
