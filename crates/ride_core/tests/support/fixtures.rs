use std::sync::Arc;

use ride_core::clock::ManualClock;
use ride_core::matching::MatchingAlgorithmKind;
use ride_core::model::{CarCategory, Driver, RideRequest};
use ride_core::random::SeededRandom;
use ride_core::test_helpers::FixedRandom;
use ride_core::{RideConfig, RideService};

/// A service on a manual clock with the given algorithm and fixed mid-range draws.
pub fn service_on_manual_clock(algorithm: MatchingAlgorithmKind) -> (RideService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let service = RideService::builder(RideConfig::default().with_algorithm(algorithm))
        .random(Arc::new(FixedRandom::new(0.5)))
        .clock(clock.clone())
        .build()
        .expect("valid config");
    (service, clock)
}

/// Default simulated-distance matching with a seeded random source.
pub fn seeded_service(seed: u64) -> RideService {
    RideService::builder(RideConfig::default())
        .random(Arc::new(SeededRandom::new(seed)))
        .build()
        .expect("valid config")
}

/// Register `count` drivers of `category`, named after their index.
pub fn register_fleet(service: &RideService, category: CarCategory, count: usize) -> Vec<Driver> {
    (0..count)
        .map(|i| {
            service.register_driver(
                &format!("{category} driver {i}"),
                "Fleet Model",
                &format!("FLEET{i:04}"),
                category,
            )
        })
        .collect()
}

pub fn ride(rider: &str, distance_km: u32, category: CarCategory) -> RideRequest {
    RideRequest::new(rider, "Central Station", "Airport", distance_km, category)
}
