//! Telemetry / KPIs: running counters for the booking lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lock-free counters updated by the ride service.
#[derive(Debug, Default)]
pub struct RideTelemetry {
    bookings_created: AtomicU64,
    bookings_completed: AtomicU64,
    bookings_cancelled: AtomicU64,
    requests_unmatched: AtomicU64,
    promo_uses: AtomicU64,
    cancellation_fees_cents: AtomicU64,
}

/// Point-in-time copy of [`RideTelemetry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    pub bookings_created: u64,
    pub bookings_completed: u64,
    pub bookings_cancelled: u64,
    pub requests_unmatched: u64,
    pub promo_uses: u64,
    pub cancellation_fees_cents: u64,
}

impl TelemetrySnapshot {
    pub fn bookings_active(&self) -> u64 {
        self.bookings_created
            .saturating_sub(self.bookings_completed)
            .saturating_sub(self.bookings_cancelled)
    }

    pub fn cancellation_fees(&self) -> f64 {
        self.cancellation_fees_cents as f64 / 100.0
    }
}

impl RideTelemetry {
    pub fn record_booking_created(&self) {
        self.bookings_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_booking_completed(&self) {
        self.bookings_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_booking_cancelled(&self, fee: f64) {
        self.bookings_cancelled.fetch_add(1, Ordering::Relaxed);
        let cents = (fee * 100.0).round().max(0.0) as u64;
        self.cancellation_fees_cents.fetch_add(cents, Ordering::Relaxed);
    }

    pub fn record_unmatched_request(&self) {
        self.requests_unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_promo_use(&self) {
        self.promo_uses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            bookings_created: self.bookings_created.load(Ordering::Relaxed),
            bookings_completed: self.bookings_completed.load(Ordering::Relaxed),
            bookings_cancelled: self.bookings_cancelled.load(Ordering::Relaxed),
            requests_unmatched: self.requests_unmatched.load(Ordering::Relaxed),
            promo_uses: self.promo_uses.load(Ordering::Relaxed),
            cancellation_fees_cents: self.cancellation_fees_cents.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let telemetry = RideTelemetry::default();
        telemetry.record_booking_created();
        telemetry.record_booking_created();
        telemetry.record_booking_created();
        telemetry.record_booking_completed();
        telemetry.record_booking_cancelled(20.0);
        telemetry.record_booking_cancelled(33.33);
        telemetry.record_unmatched_request();
        telemetry.record_promo_use();

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.bookings_created, 3);
        assert_eq!(snapshot.bookings_completed, 1);
        assert_eq!(snapshot.bookings_cancelled, 2);
        assert_eq!(snapshot.bookings_active(), 0);
        assert_eq!(snapshot.requests_unmatched, 1);
        assert_eq!(snapshot.promo_uses, 1);
        assert_eq!(snapshot.cancellation_fees_cents, 5333);
        assert!((snapshot.cancellation_fees() - 53.33).abs() < 1e-9);
    }
}
