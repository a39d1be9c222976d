use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::clock::ManualClock;
use crate::error::{RideError, RideResult};
use crate::model::{BookingId, CarCategory, RideRequest};
use crate::scenario::params::ScenarioParams;
use crate::service::RideService;

const PLACES: [&str; 8] = [
    "Central Station",
    "Airport",
    "Tech Park",
    "Marina Beach",
    "City Mall",
    "University",
    "Old Town",
    "Harbour",
];

const RIDERS: [&str; 4] = ["pravin", "asha", "kiran", "meera"];

/// Register the demo fleet and promo codes.
pub fn seed_demo(service: &RideService) -> RideResult<()> {
    service.register_driver("Aarav Etioson", "Toyota Etios", "TN07EX1234", CarCategory::Sedan);
    service.register_driver("Ryder Dzirex", "Swift Dzire", "TN11DZ5521", CarCategory::Sedan);
    service.register_driver("Ethan iDrive", "Hyundai i20", "TN09I27711", CarCategory::Compact);
    service.add_promo("FIRST50", 50.0, 1)?;
    service.add_promo("SAVE20", 20.0, 5)?;
    Ok(())
}

/// Tally of a scripted session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub requested: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub held_active: usize,
    pub fares_total: f64,
    pub cancellation_fees_total: f64,
    pub bookings: Vec<BookingId>,
}

/// Issue `params.rides` ride requests against `service`.
///
/// Each matched ride is completed (and its driver rated) or cancelled. The
/// last `hold_active` rides are left open. When `clock` is the service's
/// manual clock, a random number of minutes passes before each ride ends so
/// that late cancellations pay a fee.
pub fn run_scripted_rides(
    service: &RideService,
    params: &ScenarioParams,
    clock: Option<&ManualClock>,
) -> ScenarioOutcome {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut outcome = ScenarioOutcome::default();
    let hold_from = params.rides.saturating_sub(params.hold_active);

    for i in 0..params.rides {
        let rider = RIDERS[rng.gen_range(0..RIDERS.len())];
        let pickup = PLACES[rng.gen_range(0..PLACES.len())];
        let drop = PLACES[rng.gen_range(0..PLACES.len())];
        let category = CarCategory::ALL[rng.gen_range(0..CarCategory::ALL.len())];
        let distance_km = rng.gen_range(1..=params.max_distance_km.max(1));
        let request = RideRequest::new(rider, pickup, drop, distance_km, category);

        outcome.requested += 1;
        let booking = match service.quote_and_request(&request, params.promo_code.as_deref()) {
            Ok((_, booking)) => booking,
            Err(RideError::Unavailable { .. }) => {
                outcome.unmatched += 1;
                continue;
            }
            Err(err) => {
                info!(%err, "scripted request skipped");
                continue;
            }
        };
        outcome.matched += 1;
        outcome.bookings.push(booking.id);

        if i >= hold_from {
            outcome.held_active += 1;
            continue;
        }

        if let Some(clock) = clock {
            clock.advance_minutes(rng.gen_range(0..=params.max_ride_minutes.max(0)));
        }

        if rng.gen_bool(params.complete_ratio.clamp(0.0, 1.0)) {
            if service.complete_booking(booking.id, rider).is_ok() {
                outcome.completed += 1;
                outcome.fares_total += booking.estimated_fare;
                let stars = rng.gen_range(3..=5);
                if let Err(err) = service.rate_driver(booking.driver_id, stars) {
                    warn!(driver_id = %booking.driver_id, %err, "scripted rating skipped");
                }
            }
        } else if let Ok(fee) = service.cancel_booking(booking.id, rider) {
            outcome.cancelled += 1;
            outcome.cancellation_fees_total += fee;
        }
    }

    info!(
        requested = outcome.requested,
        matched = outcome.matched,
        completed = outcome.completed,
        cancelled = outcome.cancelled,
        "scripted session finished"
    );
    outcome
}
