use crate::model::{CarCategory, Driver};
use crate::random::RandomSource;

use super::algorithm::MatchingAlgorithm;
use super::types::{MatchCandidate, MatchingConfig};

/// Ranks available drivers by a simulated pickup distance.
///
/// Each available driver gets a distance drawn uniformly from
/// `[min_distance_km, max_distance_km)`; drivers of another category pay
/// `category_mismatch_penalty_km` on top. The strictly smallest distance
/// wins, so ties go to the driver evaluated first. Every driver is sampled
/// exactly once per call.
#[derive(Debug, Default)]
pub struct SimulatedDistanceMatching {
    config: MatchingConfig,
}

impl SimulatedDistanceMatching {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    fn simulated_distance_km(
        &self,
        requested: CarCategory,
        driver: &Driver,
        rng: &dyn RandomSource,
    ) -> f64 {
        let mut distance = rng.uniform(self.config.min_distance_km, self.config.max_distance_km);
        if driver.category() != requested {
            distance += self.config.category_mismatch_penalty_km;
        }
        distance
    }
}

impl MatchingAlgorithm for SimulatedDistanceMatching {
    fn select_driver(
        &self,
        category: CarCategory,
        drivers: &[Driver],
        rng: &dyn RandomSource,
    ) -> Option<MatchCandidate> {
        let mut best_match: Option<MatchCandidate> = None;

        for driver in drivers.iter().filter(|d| d.available) {
            let distance = self.simulated_distance_km(category, driver, rng);
            match best_match {
                Some(best) if distance >= best.simulated_distance_km => {}
                _ => {
                    best_match = Some(MatchCandidate {
                        driver_id: driver.id,
                        simulated_distance_km: distance,
                    })
                }
            }
        }

        best_match
    }
}
