use crate::model::{CarCategory, Driver};
use crate::random::RandomSource;

use super::algorithm::MatchingAlgorithm;
use super::types::MatchCandidate;

/// Deterministic baseline: the first available driver of the requested
/// category in registration order, else the first available driver of any
/// category.
///
/// Useful for scripted demos and for tests that need a predictable pick.
#[derive(Debug, Default)]
pub struct FirstAvailableMatching;

impl MatchingAlgorithm for FirstAvailableMatching {
    fn select_driver(
        &self,
        category: CarCategory,
        drivers: &[Driver],
        _rng: &dyn RandomSource,
    ) -> Option<MatchCandidate> {
        drivers
            .iter()
            .find(|d| d.available && d.category() == category)
            .or_else(|| drivers.iter().find(|d| d.available))
            .map(|d| MatchCandidate {
                driver_id: d.id,
                simulated_distance_km: 0.0,
            })
    }
}
