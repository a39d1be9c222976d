//! In-memory ride-hailing engine: fare estimation, promo codes, driver
//! matching and the booking lifecycle.

pub mod bookings;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod export;
pub mod matching;
pub mod model;
pub mod pricing;
pub mod promo;
pub mod random;
pub mod scenario;
pub mod service;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use config::RideConfig;
pub use error::{RideError, RideResult};
pub use service::RideService;
