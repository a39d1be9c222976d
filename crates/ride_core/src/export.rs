//! JSON export of the in-memory state, for inspection after a session.

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::model::{Booking, Driver, Promo};
use crate::service::RideService;
use crate::telemetry::TelemetrySnapshot;

/// Everything a session leaves behind.
#[derive(Debug, Serialize)]
pub struct SessionExport {
    pub drivers: Vec<Driver>,
    pub promos: Vec<Promo>,
    pub bookings: Vec<Booking>,
    pub telemetry: TelemetrySnapshot,
}

impl SessionExport {
    pub fn capture(service: &RideService) -> Self {
        Self {
            drivers: service.list_drivers(),
            promos: service.list_promos(),
            bookings: service.all_bookings(),
            telemetry: service.telemetry(),
        }
    }
}

pub fn bookings_to_json(bookings: &[Booking]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(bookings)
}

pub fn drivers_to_json(drivers: &[Driver]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(drivers)
}

pub fn write_session_json<W: Write>(writer: W, service: &RideService) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &SessionExport::capture(service))
}

pub fn write_session_json_file<P: AsRef<Path>>(
    path: P,
    service: &RideService,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    write_session_json(file, service)?;
    Ok(())
}
