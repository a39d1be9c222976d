//! Booking ledger and the booking state machine.
//!
//! ```text
//! Active ──complete──▶ Completed
//!    │
//!    └────cancel────▶ Cancelled
//! ```
//!
//! Both terminal states are final. A transition either applies in full
//! (status, timestamp, driver release) or not at all. Whenever the ledger
//! and the driver registry are both locked, the ledger is locked first.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::ensure_non_negative;
use crate::drivers::{DriverRegistry, DriverTable};
use crate::error::{Entity, RideError, RideResult};
use crate::model::{Booking, BookingId, BookingStatus, Driver, DriverId, FareEstimate, RideRequest};
use crate::pricing::round2;

/// Fee charged when a rider cancels an active booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancellationPolicy {
    /// Cancelling within this many whole minutes of booking is free.
    pub free_window_minutes: i64,
    pub min_fee: f64,
    /// Share of the estimated fare charged after the free window.
    pub fee_rate: f64,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            free_window_minutes: 2,
            min_fee: 20.0,
            fee_rate: 0.10,
        }
    }
}

impl CancellationPolicy {
    pub fn with_free_window_minutes(mut self, minutes: i64) -> Self {
        self.free_window_minutes = minutes;
        self
    }

    pub fn validate(&self) -> RideResult<()> {
        if self.free_window_minutes < 0 {
            return Err(RideError::InvalidInput(format!(
                "free_window_minutes must be non-negative, got {}",
                self.free_window_minutes
            )));
        }
        ensure_non_negative("min_fee", self.min_fee)?;
        ensure_non_negative("fee_rate", self.fee_rate)
    }

    pub fn fee(&self, estimated_fare: f64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let elapsed_minutes = (now - created_at).num_minutes().max(0);
        if elapsed_minutes <= self.free_window_minutes {
            return 0.0;
        }
        round2(self.min_fee.max(self.fee_rate * estimated_fare))
    }
}

#[derive(Debug)]
struct BookingTable {
    bookings: Vec<Booking>,
    next_id: u32,
}

impl Default for BookingTable {
    fn default() -> Self {
        Self {
            bookings: Vec::new(),
            next_id: 1,
        }
    }
}

impl BookingTable {
    /// Resolve an active booking owned by `rider`, or say why not.
    fn active_for(&mut self, id: BookingId, rider: &str) -> RideResult<&mut Booking> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(RideError::NotFound(Entity::Booking(id)))?;
        if booking.rider != rider {
            return Err(RideError::Unauthorized {
                booking: id,
                rider: rider.to_string(),
            });
        }
        if booking.status != BookingStatus::Active {
            return Err(RideError::InvalidState {
                booking: id,
                status: booking.status,
            });
        }
        Ok(booking)
    }
}

fn release_driver(drivers: &mut DriverTable, id: DriverId) {
    // A busy driver cannot be removed, so the record is still there.
    if let Some(driver) = drivers.get_mut(id) {
        driver.available = true;
    }
}

#[derive(Debug)]
pub struct BookingLedger {
    table: RwLock<BookingTable>,
    policy: CancellationPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new(CancellationPolicy::default(), Arc::new(SystemClock))
    }
}

impl BookingLedger {
    pub fn new(policy: CancellationPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(BookingTable::default()),
            policy,
            clock,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BookingTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BookingTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Book a driver for `request`.
    ///
    /// `select` sees the whole fleet while it is locked and names the driver
    /// to assign; the chosen driver is marked busy in the same critical
    /// section. `None`, or a pick that is no longer available, rejects the
    /// request with `Unavailable` and leaves every driver untouched.
    pub fn create<F>(
        &self,
        request: &RideRequest,
        estimate: &FareEstimate,
        drivers: &DriverRegistry,
        select: F,
    ) -> RideResult<Booking>
    where
        F: FnOnce(&[Driver]) -> Option<DriverId>,
    {
        if request.distance_km == 0 {
            return Err(RideError::InvalidInput(
                "distance must be at least 1 km".to_string(),
            ));
        }
        let unavailable = RideError::Unavailable {
            category: request.category,
        };

        let mut table = self.write();
        let mut fleet = drivers.write();
        let driver_id = select(fleet.drivers()).ok_or_else(|| unavailable.clone())?;
        let driver = fleet
            .get_mut(driver_id)
            .filter(|d| d.available)
            .ok_or(unavailable)?;
        driver.available = false;

        let booking = Booking {
            id: BookingId(table.next_id),
            rider: request.rider.clone(),
            pickup: request.pickup.clone(),
            drop: request.drop.clone(),
            category: request.category,
            distance_km: request.distance_km,
            driver_id,
            driver_name: driver.name.clone(),
            status: BookingStatus::Active,
            created_at: self.clock.now(),
            completed_at: None,
            cancelled_at: None,
            cancellation_fee: None,
            estimated_fare: estimate.final_fare,
            eta_minutes: estimate.eta_minutes,
            estimated_fuel_liters: estimate.estimated_fuel_liters,
            applied_promo: estimate.promo_code.clone(),
        };
        table.next_id += 1;
        table.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Finish an active booking and free its driver. Rating the driver is a
    /// separate step.
    pub fn complete(
        &self,
        id: BookingId,
        rider: &str,
        drivers: &DriverRegistry,
    ) -> RideResult<Booking> {
        let mut table = self.write();
        let booking = table.active_for(id, rider)?;
        let mut fleet = drivers.write();

        booking.status = BookingStatus::Completed;
        booking.completed_at = Some(self.clock.now());
        release_driver(&mut fleet, booking.driver_id);
        Ok(booking.clone())
    }

    /// Cancel an active booking, free its driver and return the fee charged.
    pub fn cancel(&self, id: BookingId, rider: &str, drivers: &DriverRegistry) -> RideResult<f64> {
        let mut table = self.write();
        let booking = table.active_for(id, rider)?;
        let mut fleet = drivers.write();

        let now = self.clock.now();
        let fee = self.policy.fee(booking.estimated_fare, booking.created_at, now);
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        booking.cancellation_fee = Some(fee);
        release_driver(&mut fleet, booking.driver_id);
        Ok(fee)
    }

    pub fn by_id(&self, id: BookingId) -> Option<Booking> {
        self.read().bookings.iter().find(|b| b.id == id).cloned()
    }

    pub fn by_rider(&self, rider: &str) -> Vec<Booking> {
        self.filtered(|b| b.rider == rider)
    }

    pub fn active_by_rider(&self, rider: &str) -> Vec<Booking> {
        self.filtered(|b| b.rider == rider && b.is_active())
    }

    pub fn by_status(&self, status: BookingStatus) -> Vec<Booking> {
        self.filtered(|b| b.status == status)
    }

    pub fn all(&self) -> Vec<Booking> {
        self.read().bookings.clone()
    }

    pub fn len(&self) -> usize {
        self.read().bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered(&self, keep: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        self.read()
            .bookings
            .iter()
            .filter(|b| keep(b))
            .cloned()
            .collect()
    }
}
