//! Test helpers for common test setup and utilities.
//!
//! Deterministic random sources and fixture builders shared by unit tests,
//! integration tests and benches.

use std::sync::{Arc, Mutex, PoisonError};

use crate::clock::ManualClock;
use crate::config::RideConfig;
use crate::matching::MatchingAlgorithmKind;
use crate::model::{CarCategory, Driver, DriverId, RatingAccumulator, Vehicle};
use crate::random::RandomSource;
use crate::service::RideService;

/// Always samples the same position within the requested range:
/// `low + fraction * (high - low)`.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    fraction: f64,
}

impl FixedRandom {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }
}

impl RandomSource for FixedRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + self.fraction * (high - low)
    }
}

/// Cycles through a list of fractions, one per sample.
#[derive(Debug)]
pub struct SequenceRandom {
    fractions: Vec<f64>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    /// # Panics
    ///
    /// Panics if `fractions` is empty.
    pub fn new(fractions: Vec<f64>) -> Self {
        assert!(!fractions.is_empty(), "sequence needs at least one value");
        Self {
            fractions,
            cursor: Mutex::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let fraction = self.fractions[*cursor % self.fractions.len()];
        *cursor += 1;
        if high <= low {
            return low;
        }
        low + fraction * (high - low)
    }
}

/// A bare driver record for algorithm tests that bypass the registry.
pub fn driver(id: u32, category: CarCategory, available: bool) -> Driver {
    Driver {
        id: DriverId(id),
        name: format!("Driver {id}"),
        vehicle: Vehicle {
            model: "Test Model".to_string(),
            plate: format!("TEST{id:04}"),
            category,
        },
        available,
        rating: RatingAccumulator::default(),
    }
}

/// A service on a manual clock with deterministic first-available matching
/// and mid-range random draws. Returns the clock so tests can move time.
pub fn deterministic_service() -> (RideService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let config = RideConfig::default().with_algorithm(MatchingAlgorithmKind::FirstAvailable);
    let service = RideService::builder(config)
        .random(Arc::new(FixedRandom::new(0.5)))
        .clock(clock.clone())
        .build()
        .expect("deterministic config is valid");
    (service, clock)
}
