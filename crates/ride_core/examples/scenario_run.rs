//! Seed the demo fleet, run a scripted session on a simulated clock and
//! print every booking.
//!
//! Run with: cargo run -p ride_core --example scenario_run

use std::sync::Arc;

use ride_core::clock::ManualClock;
use ride_core::scenario::{run_scripted_rides, seed_demo, ScenarioParams};
use ride_core::{RideConfig, RideService};

fn main() {
    const RIDES: usize = 20;
    const SEED: u64 = 123;

    let clock = Arc::new(ManualClock::default());
    let service = RideService::builder(RideConfig::default())
        .seed(SEED)
        .clock(clock.clone())
        .build()
        .expect("default config is valid");
    seed_demo(&service).expect("demo data");

    let params = ScenarioParams::default()
        .with_rides(RIDES)
        .with_seed(SEED)
        .with_promo_code("SAVE20")
        .with_hold_active(2);
    let outcome = run_scripted_rides(&service, &params, Some(clock.as_ref()));

    println!("--- Scenario run ({} rides, seed {}) ---", RIDES, SEED);
    println!(
        "Matched: {}  Unmatched: {}  Completed: {}  Cancelled: {}  Still active: {}",
        outcome.matched, outcome.unmatched, outcome.completed, outcome.cancelled, outcome.held_active
    );
    println!(
        "Fares collected: {:.2}  Cancellation fees: {:.2}",
        outcome.fares_total, outcome.cancellation_fees_total
    );

    println!("\nDrivers:");
    for driver in service.list_drivers() {
        println!("  {driver}");
    }

    println!("\nBookings:");
    for booking in service.all_bookings() {
        println!("  {}", booking.summary());
    }
}
