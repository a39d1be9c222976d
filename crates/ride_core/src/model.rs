use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RideError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub u32);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Vehicle class. Drives the fare multiplier, the fuel rate and the matching penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarCategory {
    Compact,
    Sedan,
    Suv,
}

impl CarCategory {
    pub const ALL: [CarCategory; 3] = [CarCategory::Compact, CarCategory::Sedan, CarCategory::Suv];
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CarCategory::Compact => "COMPACT",
            CarCategory::Sedan => "SEDAN",
            CarCategory::Suv => "SUV",
        };
        f.write_str(label)
    }
}

impl FromStr for CarCategory {
    type Err = RideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "mini" => Ok(CarCategory::Compact),
            "sedan" => Ok(CarCategory::Sedan),
            "suv" => Ok(CarCategory::Suv),
            other => Err(RideError::InvalidInput(format!(
                "unknown car category '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub model: String,
    pub plate: String,
    pub category: CarCategory,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.model, self.plate, self.category)
    }
}

/// Running star total for a driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingAccumulator {
    pub sum: u32,
    pub count: u32,
}

impl RatingAccumulator {
    pub fn record(&mut self, stars: u8) {
        self.sum = self.sum.saturating_add(u32::from(stars));
        self.count = self.count.saturating_add(1);
    }

    /// Mean star rating, or `None` before the first rating.
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| f64::from(self.sum) / f64::from(self.count))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub vehicle: Vehicle,
    /// False for exactly as long as the driver is assigned to an active booking.
    pub available: bool,
    pub rating: RatingAccumulator,
}

impl Driver {
    pub fn category(&self) -> CarCategory {
        self.vehicle.category
    }

    pub fn brief(&self) -> String {
        format!("{} ({}) [{}]", self.name, self.vehicle.model, self.vehicle.plate)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let availability = if self.available { "Available" } else { "Busy" };
        write!(
            f,
            "Driver #{}: {} | {} | {} | Rating: ",
            self.id, self.name, self.vehicle, availability
        )?;
        match self.rating.average() {
            Some(avg) => write!(f, "{avg:.2} ({})", self.rating.count),
            None => f.write_str("No ratings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Promo {
    /// Always upper-case; lookups normalise the caller's code the same way.
    pub code: String,
    pub percent: f64,
    pub uses_left: u32,
}

impl fmt::Display for Promo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%), usesLeft={}", self.code, self.percent, self.uses_left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Active => "ACTIVE",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// Fare breakdown produced by the estimator. Not stored on its own; its
/// fields are copied onto the booking it was quoted for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareEstimate {
    pub base_fare: f64,
    pub distance_fare: f64,
    pub surge_amount: f64,
    pub promo_discount: f64,
    pub final_fare: f64,
    pub eta_minutes: u32,
    pub estimated_fuel_liters: f64,
    /// Set only when a promo actually discounted this fare.
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRequest {
    pub rider: String,
    pub pickup: String,
    pub drop: String,
    pub distance_km: u32,
    pub category: CarCategory,
}

impl RideRequest {
    pub fn new(
        rider: impl Into<String>,
        pickup: impl Into<String>,
        drop: impl Into<String>,
        distance_km: u32,
        category: CarCategory,
    ) -> Self {
        Self {
            rider: rider.into(),
            pickup: pickup.into(),
            drop: drop.into(),
            distance_km,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub rider: String,
    pub pickup: String,
    pub drop: String,
    pub category: CarCategory,
    pub distance_km: u32,
    pub driver_id: DriverId,
    /// Name captured at assignment so history still reads after the driver is removed.
    pub driver_name: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_fee: Option<f64>,
    pub estimated_fare: f64,
    pub eta_minutes: u32,
    pub estimated_fuel_liters: f64,
    pub applied_promo: Option<String>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// One-line form used in confirmations.
    pub fn summary(&self) -> String {
        format!(
            "Booking #{} | Rider:{} | {}->{} | Driver:{} | Fare:{:.2} | Status:{}",
            self.id,
            self.rider,
            self.pickup,
            self.drop,
            self.driver_name,
            self.estimated_fare,
            self.status
        )
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Booking #{}", self.id)?;
        writeln!(f, " Rider: {}", self.rider)?;
        writeln!(f, " Pickup: {}", self.pickup)?;
        writeln!(f, " Drop: {}", self.drop)?;
        writeln!(f, " Distance: {} km ({})", self.distance_km, self.category)?;
        writeln!(f, " Driver: {} (#{})", self.driver_name, self.driver_id)?;
        writeln!(
            f,
            " Estimated fare: {:.2} (Promo: {})",
            self.estimated_fare,
            self.applied_promo.as_deref().unwrap_or("none")
        )?;
        writeln!(f, " ETA: {} mins", self.eta_minutes)?;
        writeln!(f, " Fuel est: {:.2} L", self.estimated_fuel_liters)?;
        writeln!(f, " Created: {}", self.created_at.format(TIMESTAMP_FORMAT))?;
        if let Some(at) = self.completed_at {
            writeln!(f, " Completed: {}", at.format(TIMESTAMP_FORMAT))?;
        }
        if let Some(at) = self.cancelled_at {
            writeln!(f, " Cancelled: {}", at.format(TIMESTAMP_FORMAT))?;
        }
        if let Some(fee) = self.cancellation_fee {
            writeln!(f, " Cancellation fee: {fee:.2}")?;
        }
        write!(f, " Status: {}", self.status)
    }
}
