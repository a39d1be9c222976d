//! Caller-visible rejections for every mutating operation in the engine.

use std::fmt;

use crate::model::{BookingId, BookingStatus, CarCategory, DriverId};

/// What a lookup was searching for when it came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Driver(DriverId),
    Booking(BookingId),
    Promo(String),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Driver(id) => write!(f, "driver #{id}"),
            Entity::Booking(id) => write!(f, "booking #{id}"),
            Entity::Promo(code) => write!(f, "promo {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RideError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("booking #{booking} is {status}, not active")]
    InvalidState {
        booking: BookingId,
        status: BookingStatus,
    },
    #[error("booking #{booking} does not belong to rider {rider}")]
    Unauthorized { booking: BookingId, rider: String },
    #[error("no driver available for a {category} ride")]
    Unavailable { category: CarCategory },
    #[error("driver #{driver} is on an active booking")]
    Conflict { driver: DriverId },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type RideResult<T> = Result<T, RideError>;
