//! Scenario setup: seed the demo fleet and drive scripted ride sessions
//! through a [`crate::service::RideService`].

mod build;
mod params;

pub use build::{run_scripted_rides, seed_demo, ScenarioOutcome};
pub use params::ScenarioParams;
