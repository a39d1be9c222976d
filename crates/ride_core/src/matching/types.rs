use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, ensure_ordered};
use crate::error::RideResult;
use crate::model::DriverId;

/// The driver a matching pass settled on and the distance it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    pub driver_id: DriverId,
    pub simulated_distance_km: f64,
}

/// Tuning for simulated-distance matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub min_distance_km: f64,
    pub max_distance_km: f64,
    /// Added to a driver's simulated distance when their category differs
    /// from the requested one.
    pub category_mismatch_penalty_km: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_distance_km: 1.0,
            max_distance_km: 11.0,
            category_mismatch_penalty_km: 2.0,
        }
    }
}

impl MatchingConfig {
    pub fn with_category_mismatch_penalty_km(mut self, penalty_km: f64) -> Self {
        self.category_mismatch_penalty_km = penalty_km;
        self
    }

    pub fn validate(&self) -> RideResult<()> {
        ensure_non_negative("min_distance_km", self.min_distance_km)?;
        ensure_ordered(
            "min_distance_km",
            self.min_distance_km,
            "max_distance_km",
            self.max_distance_km,
        )?;
        ensure_non_negative("category_mismatch_penalty_km", self.category_mismatch_penalty_km)
    }
}
