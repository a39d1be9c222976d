use serde::{Deserialize, Serialize};

use crate::bookings::CancellationPolicy;
use crate::error::{RideError, RideResult};
use crate::matching::{MatchingAlgorithmKind, MatchingConfig};
use crate::pricing::PricingConfig;

/// Reject a negative (or NaN) tunable.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> RideResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(RideError::InvalidInput(format!(
            "{field} must be non-negative, got {value}"
        )))
    }
}

/// Reject a `[low, high]` range whose ends are out of order.
pub(crate) fn ensure_ordered(
    low_field: &str,
    low: f64,
    high_field: &str,
    high: f64,
) -> RideResult<()> {
    if low <= high {
        Ok(())
    } else {
        Err(RideError::InvalidInput(format!(
            "{low_field} ({low}) exceeds {high_field} ({high})"
        )))
    }
}

/// Tunables for a [`crate::service::RideService`]. Every field falls back to
/// the demo defaults, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideConfig {
    pub pricing: PricingConfig,
    pub matching: MatchingConfig,
    pub cancellation: CancellationPolicy,
    pub algorithm: MatchingAlgorithmKind,
}

impl RideConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> RideResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| RideError::InvalidInput(format!("config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Fees, fares, fuel rates and distances are never negative and every
    /// range has `low <= high`.
    pub fn validate(&self) -> RideResult<()> {
        self.pricing.validate()?;
        self.matching.validate()?;
        self.cancellation.validate()
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationPolicy) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_algorithm(mut self, algorithm: MatchingAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }
}
