//! The ride service: the one handle an outer layer (CLI, admin tooling)
//! talks to. It owns the registries and wires a ride request through
//! estimation, promo discount, matching and booking.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bookings::BookingLedger;
use crate::clock::{Clock, SystemClock};
use crate::config::RideConfig;
use crate::drivers::DriverRegistry;
use crate::error::{RideError, RideResult};
use crate::matching::MatchingAlgorithm;
use crate::model::{
    Booking, BookingId, CarCategory, Driver, DriverId, FareEstimate, Promo, RatingAccumulator,
    RideRequest,
};
use crate::pricing::FareEstimator;
use crate::promo::PromoLedger;
use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::telemetry::{RideTelemetry, TelemetrySnapshot};

pub struct RideServiceBuilder {
    config: RideConfig,
    random: Option<Arc<dyn RandomSource>>,
    clock: Option<Arc<dyn Clock>>,
    matcher: Option<Box<dyn MatchingAlgorithm>>,
}

impl RideServiceBuilder {
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    /// Shorthand for a [`SeededRandom`] source.
    pub fn seed(self, seed: u64) -> Self {
        self.random(Arc::new(SeededRandom::new(seed)))
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Override the algorithm named in the config.
    pub fn matcher(mut self, matcher: Box<dyn MatchingAlgorithm>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Validate the config and assemble the service.
    pub fn build(self) -> RideResult<RideService> {
        self.config.validate()?;
        Ok(self.assemble())
    }

    fn assemble(self) -> RideService {
        let config = self.config;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        RideService {
            estimator: FareEstimator::new(config.pricing),
            promos: PromoLedger::default(),
            drivers: DriverRegistry::default(),
            matcher: self
                .matcher
                .unwrap_or_else(|| config.algorithm.build(config.matching)),
            bookings: BookingLedger::new(config.cancellation, clock),
            random: self.random.unwrap_or_else(|| Arc::new(ThreadRandom)),
            telemetry: RideTelemetry::default(),
            config,
        }
    }
}

/// In-memory ride-hailing engine. `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct RideService {
    config: RideConfig,
    estimator: FareEstimator,
    promos: PromoLedger,
    drivers: DriverRegistry,
    matcher: Box<dyn MatchingAlgorithm>,
    bookings: BookingLedger,
    random: Arc<dyn RandomSource>,
    telemetry: RideTelemetry,
}

impl Default for RideService {
    fn default() -> Self {
        // The default config passes validation.
        Self::builder(RideConfig::default()).assemble()
    }
}

impl RideService {
    pub fn new(config: RideConfig) -> RideResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: RideConfig) -> RideServiceBuilder {
        RideServiceBuilder {
            config,
            random: None,
            clock: None,
            matcher: None,
        }
    }

    pub fn config(&self) -> &RideConfig {
        &self.config
    }

    // ── Drivers ─────────────────────────────────────────────────────

    pub fn register_driver(
        &self,
        name: &str,
        model: &str,
        plate: &str,
        category: CarCategory,
    ) -> Driver {
        let driver = self.drivers.register(name, model, plate, category);
        debug!(driver_id = %driver.id, %category, "driver registered");
        driver
    }

    pub fn remove_driver(&self, id: DriverId) -> RideResult<Driver> {
        self.drivers
            .remove(id)
            .inspect(|_| debug!(driver_id = %id, "driver removed"))
            .inspect_err(|err| warn!(driver_id = %id, %err, "driver removal rejected"))
    }

    pub fn list_drivers(&self) -> Vec<Driver> {
        self.drivers.list()
    }

    pub fn find_driver(&self, id: DriverId) -> Option<Driver> {
        self.drivers.find(id)
    }

    // ── Promos ──────────────────────────────────────────────────────

    pub fn add_promo(&self, code: &str, percent: f64, max_uses: u32) -> RideResult<Promo> {
        self.promos
            .add_promo(code, percent, max_uses)
            .inspect(|promo| debug!(code = %promo.code, percent, max_uses, "promo added"))
    }

    pub fn remove_promo(&self, code: &str) -> bool {
        self.promos.remove_promo(code)
    }

    pub fn list_promos(&self) -> Vec<Promo> {
        self.promos.list()
    }

    pub fn find_promo(&self, code: &str) -> Option<Promo> {
        self.promos.find(code)
    }

    // ── Rides ───────────────────────────────────────────────────────

    /// Quote a ride. Consumes one use of `promo_code` when it applies.
    pub fn estimate_fare(
        &self,
        distance_km: u32,
        category: CarCategory,
        promo_code: Option<&str>,
    ) -> RideResult<FareEstimate> {
        let estimate = self.estimator.estimate(
            distance_km,
            category,
            promo_code,
            &self.promos,
            self.random.as_ref(),
        )?;
        if let Some(code) = &estimate.promo_code {
            self.telemetry.record_promo_use();
            debug!(%code, discount = estimate.promo_discount, "promo applied");
        }
        Ok(estimate)
    }

    /// Match a driver and open a booking at the quoted fare.
    pub fn request_ride(&self, request: &RideRequest, estimate: &FareEstimate) -> RideResult<Booking> {
        let result = self.bookings.create(request, estimate, &self.drivers, |fleet| {
            self.matcher
                .select_driver(request.category, fleet, self.random.as_ref())
                .map(|candidate| candidate.driver_id)
        });
        match &result {
            Ok(booking) => {
                self.telemetry.record_booking_created();
                debug!(
                    booking_id = %booking.id,
                    driver_id = %booking.driver_id,
                    rider = %booking.rider,
                    fare = booking.estimated_fare,
                    "booking created"
                );
            }
            Err(err) => {
                if matches!(err, RideError::Unavailable { .. }) {
                    self.telemetry.record_unmatched_request();
                }
                warn!(rider = %request.rider, category = %request.category, %err, "ride request rejected");
            }
        }
        result
    }

    /// Estimate and request in one step.
    pub fn quote_and_request(
        &self,
        request: &RideRequest,
        promo_code: Option<&str>,
    ) -> RideResult<(FareEstimate, Booking)> {
        let estimate = self.estimate_fare(request.distance_km, request.category, promo_code)?;
        let booking = self.request_ride(request, &estimate)?;
        Ok((estimate, booking))
    }

    pub fn complete_booking(&self, id: BookingId, rider: &str) -> RideResult<Booking> {
        self.bookings
            .complete(id, rider, &self.drivers)
            .inspect(|booking| {
                self.telemetry.record_booking_completed();
                debug!(booking_id = %id, driver_id = %booking.driver_id, "booking completed");
            })
            .inspect_err(|err| warn!(booking_id = %id, %rider, %err, "completion rejected"))
    }

    /// Rate the driver of a finished ride, 1 to 5 stars.
    pub fn rate_driver(&self, driver_id: DriverId, stars: u8) -> RideResult<RatingAccumulator> {
        self.drivers
            .add_rating(driver_id, stars)
            .inspect(|rating| debug!(%driver_id, stars, count = rating.count, "driver rated"))
            .inspect_err(|err| warn!(%driver_id, %err, "rating rejected"))
    }

    /// Cancel an active booking; returns the fee charged.
    pub fn cancel_booking(&self, id: BookingId, rider: &str) -> RideResult<f64> {
        self.bookings
            .cancel(id, rider, &self.drivers)
            .inspect(|fee| {
                self.telemetry.record_booking_cancelled(*fee);
                debug!(booking_id = %id, fee, "booking cancelled");
            })
            .inspect_err(|err| warn!(booking_id = %id, %rider, %err, "cancellation rejected"))
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn bookings_for_rider(&self, rider: &str) -> Vec<Booking> {
        self.bookings.by_rider(rider)
    }

    pub fn active_bookings_for_rider(&self, rider: &str) -> Vec<Booking> {
        self.bookings.active_by_rider(rider)
    }

    pub fn all_bookings(&self) -> Vec<Booking> {
        self.bookings.all()
    }

    pub fn find_booking(&self, id: BookingId) -> Option<Booking> {
        self.bookings.by_id(id)
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::CancellationPolicy;
    use crate::error::Entity;
    use crate::matching::MatchingConfig;
    use crate::model::BookingStatus;
    use crate::test_helpers::deterministic_service;

    fn sedan_request(rider: &str) -> RideRequest {
        RideRequest::new(rider, "Central", "Airport", 10, CarCategory::Sedan)
    }

    #[test]
    fn ride_flows_from_quote_to_completion_and_rating() {
        let (service, _clock) = deterministic_service();
        let driver = service.register_driver("Aarav", "Toyota Etios", "TN07EX1234", CarCategory::Sedan);
        service.add_promo("SAVE20", 20.0, 5).unwrap();

        let (estimate, booking) = service
            .quote_and_request(&sedan_request("pravin"), Some("save20"))
            .expect("ride");
        assert_eq!(booking.driver_id, driver.id);
        assert_eq!(booking.estimated_fare, estimate.final_fare);
        assert_eq!(booking.applied_promo.as_deref(), Some("SAVE20"));
        assert_eq!(service.find_promo("SAVE20").unwrap().uses_left, 4);
        assert!(!service.find_driver(driver.id).unwrap().available);

        service.complete_booking(booking.id, "pravin").unwrap();
        assert!(service.find_driver(driver.id).unwrap().available);
        let rating = service.rate_driver(driver.id, 5).unwrap();
        assert_eq!(rating.count, 1);

        let telemetry = service.telemetry();
        assert_eq!(telemetry.bookings_created, 1);
        assert_eq!(telemetry.bookings_completed, 1);
        assert_eq!(telemetry.promo_uses, 1);
    }

    #[test]
    fn request_without_drivers_creates_nothing() {
        let (service, _clock) = deterministic_service();
        let estimate = service.estimate_fare(4, CarCategory::Suv, None).unwrap();
        let err = service
            .request_ride(&sedan_request("pravin"), &estimate)
            .unwrap_err();
        assert!(matches!(err, RideError::Unavailable { .. }));
        assert!(service.all_bookings().is_empty());
        assert_eq!(service.telemetry().requests_unmatched, 1);
    }

    #[test]
    fn invalid_request_is_not_counted_as_unmatched() {
        let (service, _clock) = deterministic_service();
        service.register_driver("Aarav", "Toyota Etios", "TN07EX1234", CarCategory::Sedan);
        let estimate = service.estimate_fare(4, CarCategory::Sedan, None).unwrap();
        let zero_km = RideRequest::new("pravin", "Central", "Airport", 0, CarCategory::Sedan);

        let err = service.request_ride(&zero_km, &estimate).unwrap_err();
        assert!(matches!(err, RideError::InvalidInput(_)));
        assert_eq!(service.telemetry().requests_unmatched, 0);
        assert!(service.all_bookings().is_empty());
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = RideConfig::default().with_cancellation(CancellationPolicy {
            min_fee: -5.0,
            fee_rate: -0.1,
            ..CancellationPolicy::default()
        });
        assert!(matches!(
            RideService::new(config),
            Err(RideError::InvalidInput(_))
        ));

        let inverted = MatchingConfig {
            min_distance_km: 12.0,
            ..MatchingConfig::default()
        };
        let config = RideConfig::default().with_matching(inverted);
        assert!(RideService::builder(config).seed(1).build().is_err());
    }

    #[test]
    fn service_exposes_its_config() {
        let config = RideConfig::default()
            .with_cancellation(CancellationPolicy::default().with_free_window_minutes(5));
        let service = RideService::new(config).expect("valid config");
        assert_eq!(service.config().cancellation.free_window_minutes, 5);
        assert_eq!(RideService::default().config(), &RideConfig::default());
    }

    #[test]
    fn cancel_after_window_charges_fee_and_frees_driver() {
        let (service, clock) = deterministic_service();
        let driver = service.register_driver("Ryder", "Swift Dzire", "TN11DZ5521", CarCategory::Sedan);
        let (_, booking) = service
            .quote_and_request(&sedan_request("pravin"), None)
            .unwrap();

        clock.advance_minutes(5);
        let fee = service.cancel_booking(booking.id, "pravin").unwrap();
        assert_eq!(fee, 20.0);
        assert!(service.find_driver(driver.id).unwrap().available);
        assert_eq!(
            service.find_booking(booking.id).unwrap().status,
            BookingStatus::Cancelled
        );
        assert_eq!(service.telemetry().cancellation_fees_cents, 2000);

        assert!(matches!(
            service.cancel_booking(booking.id, "pravin"),
            Err(RideError::InvalidState { .. })
        ));
    }

    #[test]
    fn busy_driver_cannot_be_removed_until_ride_ends() {
        let (service, _clock) = deterministic_service();
        let driver = service.register_driver("Ethan", "Hyundai i20", "TN09I27711", CarCategory::Compact);
        let (_, booking) = service
            .quote_and_request(&sedan_request("pravin"), None)
            .unwrap();

        assert_eq!(
            service.remove_driver(driver.id),
            Err(RideError::Conflict { driver: driver.id })
        );
        service.complete_booking(booking.id, "pravin").unwrap();
        assert!(service.remove_driver(driver.id).is_ok());
        assert_eq!(
            service.remove_driver(driver.id),
            Err(RideError::NotFound(Entity::Driver(driver.id)))
        );
    }
}
