pub mod algorithm;
pub mod first_available;
pub mod simulated;
pub mod types;

use serde::{Deserialize, Serialize};

pub use algorithm::MatchingAlgorithm;
pub use first_available::FirstAvailableMatching;
pub use simulated::SimulatedDistanceMatching;
pub use types::{MatchCandidate, MatchingConfig};

/// Which matching algorithm a service is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingAlgorithmKind {
    #[default]
    SimulatedDistance,
    FirstAvailable,
}

impl MatchingAlgorithmKind {
    pub fn build(self, config: MatchingConfig) -> Box<dyn MatchingAlgorithm> {
        match self {
            MatchingAlgorithmKind::SimulatedDistance => {
                Box::new(SimulatedDistanceMatching::new(config))
            }
            MatchingAlgorithmKind::FirstAvailable => Box::new(FirstAvailableMatching),
        }
    }
}
