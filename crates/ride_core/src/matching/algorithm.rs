use crate::model::{CarCategory, Driver};
use crate::random::RandomSource;

use super::types::MatchCandidate;

/// Trait for matching algorithms that pick a driver for a ride request.
///
/// Implementations must ignore unavailable drivers and return `None` when no
/// available driver is left; callers turn that into an `Unavailable` rejection.
pub trait MatchingAlgorithm: Send + Sync + std::fmt::Debug {
    /// Pick one driver out of `drivers` for a ride in `category`.
    ///
    /// `drivers` is the full fleet in registration order. The call runs while
    /// the fleet is locked, so it must not touch the registry itself.
    fn select_driver(
        &self,
        category: CarCategory,
        drivers: &[Driver],
        rng: &dyn RandomSource,
    ) -> Option<MatchCandidate>;
}
