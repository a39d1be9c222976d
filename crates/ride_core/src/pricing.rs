//! Fare, ETA and fuel estimation for a requested ride.
//!
//! Formula: `raw = base_fare + per_km_rate * km * multiplier(category) + surge`,
//! where surge is drawn uniformly from `[0, max_surge_fraction * distance_fare]`.
//! The promo ledger then discounts the raw fare.

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, ensure_ordered};
use crate::error::{RideError, RideResult};
use crate::model::{CarCategory, FareEstimate};
use crate::promo::PromoLedger;
use crate::random::RandomSource;

/// Base fare in currency units.
pub const BASE_FARE: f64 = 30.0;

/// Per-kilometer rate in currency units.
pub const PER_KM_RATE: f64 = 10.0;

/// Per-category rate: fare multiplier and fuel burn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRate {
    pub multiplier: f64,
    pub liters_per_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub base_fare: f64,
    pub per_km_rate: f64,
    /// Upper bound of surge as a fraction of the distance fare.
    pub max_surge_fraction: f64,
    pub compact: CategoryRate,
    pub sedan: CategoryRate,
    pub suv: CategoryRate,
    pub eta_base_minutes: f64,
    pub eta_min_per_km: f64,
    pub eta_max_per_km: f64,
    pub min_eta_minutes: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            per_km_rate: PER_KM_RATE,
            max_surge_fraction: 0.5,
            compact: CategoryRate {
                multiplier: 1.0,
                liters_per_km: 0.07,
            },
            sedan: CategoryRate {
                multiplier: 1.3,
                liters_per_km: 0.09,
            },
            suv: CategoryRate {
                multiplier: 1.6,
                liters_per_km: 0.12,
            },
            eta_base_minutes: 2.0,
            eta_min_per_km: 2.0,
            eta_max_per_km: 5.0,
            min_eta_minutes: 2,
        }
    }
}

impl PricingConfig {
    pub fn rate(&self, category: CarCategory) -> CategoryRate {
        match category {
            CarCategory::Compact => self.compact,
            CarCategory::Sedan => self.sedan,
            CarCategory::Suv => self.suv,
        }
    }

    pub fn with_base_fare(mut self, base_fare: f64) -> Self {
        self.base_fare = base_fare;
        self
    }

    pub fn with_max_surge_fraction(mut self, fraction: f64) -> Self {
        self.max_surge_fraction = fraction.max(0.0);
        self
    }

    pub fn validate(&self) -> RideResult<()> {
        ensure_non_negative("base_fare", self.base_fare)?;
        ensure_non_negative("per_km_rate", self.per_km_rate)?;
        ensure_non_negative("max_surge_fraction", self.max_surge_fraction)?;
        for (name, rate) in [
            ("compact", self.compact),
            ("sedan", self.sedan),
            ("suv", self.suv),
        ] {
            ensure_non_negative(&format!("{name}.multiplier"), rate.multiplier)?;
            ensure_non_negative(&format!("{name}.liters_per_km"), rate.liters_per_km)?;
        }
        ensure_non_negative("eta_base_minutes", self.eta_base_minutes)?;
        ensure_non_negative("eta_min_per_km", self.eta_min_per_km)?;
        ensure_ordered(
            "eta_min_per_km",
            self.eta_min_per_km,
            "eta_max_per_km",
            self.eta_max_per_km,
        )
    }
}

/// Round a currency or volume amount to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Default)]
pub struct FareEstimator {
    config: PricingConfig,
}

impl FareEstimator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Quote a ride. The only side effect is consuming one use of `promo_code`
    /// when it applies.
    pub fn estimate(
        &self,
        distance_km: u32,
        category: CarCategory,
        promo_code: Option<&str>,
        promos: &PromoLedger,
        rng: &dyn RandomSource,
    ) -> RideResult<FareEstimate> {
        if distance_km == 0 {
            return Err(RideError::InvalidInput(
                "distance must be at least 1 km".to_string(),
            ));
        }
        let km = f64::from(distance_km);
        let rate = self.config.rate(category);

        let base_fare = self.config.base_fare;
        let distance_fare = self.config.per_km_rate * km * rate.multiplier;
        let surge_amount = round2(rng.uniform(0.0, self.config.max_surge_fraction * distance_fare));
        let raw_fare = base_fare + distance_fare + surge_amount;

        let discount = promos.apply(promo_code, raw_fare);

        let per_km = rng.uniform(self.config.eta_min_per_km, self.config.eta_max_per_km);
        let eta = (self.config.eta_base_minutes + km * per_km).round().max(0.0) as u32;

        Ok(FareEstimate {
            base_fare,
            distance_fare,
            surge_amount,
            promo_discount: discount.discount,
            final_fare: round2(discount.fare).max(0.0),
            eta_minutes: eta.max(self.config.min_eta_minutes),
            estimated_fuel_liters: round2(rate.liters_per_km * km),
            promo_code: discount.code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRandom, ThreadRandom};
    use crate::test_helpers::FixedRandom;

    #[test]
    fn fare_includes_base_distance_and_surge() {
        let estimator = FareEstimator::default();
        let promos = PromoLedger::default();
        // Fixed fraction 0.5 of each range: surge = 0.25 * distance fare, eta rate 3.5/km.
        let rng = FixedRandom::new(0.5);

        let estimate = estimator
            .estimate(10, CarCategory::Sedan, None, &promos, &rng)
            .expect("estimate");

        assert_eq!(estimate.base_fare, 30.0);
        assert!((estimate.distance_fare - 130.0).abs() < 1e-9);
        assert_eq!(estimate.surge_amount, 32.5);
        assert_eq!(estimate.final_fare, 192.5);
        assert_eq!(estimate.promo_discount, 0.0);
        assert_eq!(estimate.eta_minutes, 37);
        assert_eq!(estimate.estimated_fuel_liters, 0.9);
        assert_eq!(estimate.promo_code, None);
    }

    #[test]
    fn fuel_rate_depends_on_category() {
        let estimator = FareEstimator::default();
        let promos = PromoLedger::default();
        let rng = FixedRandom::new(0.0);
        let fuel = |category| {
            estimator
                .estimate(7, category, None, &promos, &rng)
                .expect("estimate")
                .estimated_fuel_liters
        };
        assert_eq!(fuel(CarCategory::Compact), 0.49);
        assert_eq!(fuel(CarCategory::Sedan), 0.63);
        assert_eq!(fuel(CarCategory::Suv), 0.84);
    }

    #[test]
    fn estimates_stay_within_bounds() {
        let estimator = FareEstimator::default();
        let promos = PromoLedger::default();
        let rng = SeededRandom::new(7);
        for km in [1, 2, 5, 25, 120] {
            for category in CarCategory::ALL {
                let estimate = estimator
                    .estimate(km, category, None, &promos, &rng)
                    .expect("estimate");
                assert!(estimate.final_fare >= 0.0);
                assert!(estimate.eta_minutes >= 2);
                assert!(estimate.surge_amount >= 0.0);
                assert!(estimate.surge_amount <= 0.5 * estimate.distance_fare + 0.005);
            }
        }
    }

    #[test]
    fn promo_discount_is_applied_once() {
        let estimator = FareEstimator::default();
        let promos = PromoLedger::default();
        promos.add_promo("first50", 50.0, 1).expect("promo");
        let rng = FixedRandom::new(0.0);

        let first = estimator
            .estimate(10, CarCategory::Compact, Some("FIRST50"), &promos, &rng)
            .expect("estimate");
        assert_eq!(first.final_fare, 65.0);
        assert_eq!(first.promo_discount, 65.0);
        assert_eq!(first.promo_code.as_deref(), Some("FIRST50"));

        let second = estimator
            .estimate(10, CarCategory::Compact, Some("first50"), &promos, &rng)
            .expect("estimate");
        assert_eq!(second.final_fare, 130.0);
        assert_eq!(second.promo_discount, 0.0);
        assert_eq!(second.promo_code, None);
    }

    #[test]
    fn surge_and_base_fare_follow_config() {
        let config = PricingConfig::default()
            .with_base_fare(50.0)
            .with_max_surge_fraction(0.0);
        let estimator = FareEstimator::new(config);
        let promos = PromoLedger::default();
        let estimate = estimator
            .estimate(10, CarCategory::Compact, None, &promos, &FixedRandom::new(1.0))
            .expect("estimate");
        assert_eq!(estimate.base_fare, 50.0);
        assert_eq!(estimate.surge_amount, 0.0);
        assert_eq!(estimate.final_fare, 150.0);

        assert_eq!(
            PricingConfig::default().with_max_surge_fraction(-1.0).max_surge_fraction,
            0.0
        );
    }

    #[test]
    fn zero_distance_is_rejected() {
        let result = FareEstimator::default().estimate(
            0,
            CarCategory::Sedan,
            None,
            &PromoLedger::default(),
            &ThreadRandom,
        );
        assert!(matches!(result, Err(RideError::InvalidInput(_))));
    }
}
