use serde::{Deserialize, Serialize};

/// Parameters for a scripted ride session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    /// Number of ride requests to issue.
    pub rides: usize,
    /// Seed for the scenario's own choices (rider, category, distance, outcome).
    pub seed: Option<u64>,
    pub max_distance_km: u32,
    /// Probability (0.0 to 1.0) that a matched ride is completed rather than cancelled.
    pub complete_ratio: f64,
    /// Upper bound of simulated minutes between booking and completion/cancellation.
    /// Only takes effect when the service runs on a manual clock.
    pub max_ride_minutes: i64,
    /// Promo code offered on every request.
    pub promo_code: Option<String>,
    /// Number of bookings left active at the end, keeping their drivers busy.
    pub hold_active: usize,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            rides: 10,
            seed: None,
            max_distance_km: 30,
            complete_ratio: 0.8,
            max_ride_minutes: 6,
            promo_code: None,
            hold_active: 0,
        }
    }
}

impl ScenarioParams {
    pub fn with_rides(mut self, rides: usize) -> Self {
        self.rides = rides;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_complete_ratio(mut self, ratio: f64) -> Self {
        self.complete_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_promo_code(mut self, code: impl Into<String>) -> Self {
        self.promo_code = Some(code.into());
        self
    }

    pub fn with_hold_active(mut self, count: usize) -> Self {
        self.hold_active = count;
        self
    }

    pub fn with_max_ride_minutes(mut self, minutes: i64) -> Self {
        self.max_ride_minutes = minutes.max(0);
        self
    }
}
