//! Promo codes with a percent discount and a limited number of uses.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{RideError, RideResult};
use crate::model::Promo;

/// Outcome of applying a promo code to a raw fare.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoDiscount {
    pub fare: f64,
    pub discount: f64,
    /// Normalised code, present only when a use was consumed.
    pub code: Option<String>,
}

impl PromoDiscount {
    fn none(fare: f64) -> Self {
        Self {
            fare,
            discount: 0.0,
            code: None,
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Default)]
pub struct PromoLedger {
    promos: Mutex<HashMap<String, Promo>>,
}

impl PromoLedger {
    fn promos(&self) -> MutexGuard<'_, HashMap<String, Promo>> {
        self.promos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a promo. Codes are case-insensitive.
    pub fn add_promo(&self, code: &str, percent: f64, max_uses: u32) -> RideResult<Promo> {
        let code = normalize(code);
        if code.is_empty() {
            return Err(RideError::InvalidInput("promo code must not be blank".to_string()));
        }
        if !(0.0..=100.0).contains(&percent) {
            return Err(RideError::InvalidInput(format!(
                "promo percent {percent} outside 0..=100"
            )));
        }
        let promo = Promo {
            code: code.clone(),
            percent,
            uses_left: max_uses,
        };
        self.promos().insert(code, promo.clone());
        Ok(promo)
    }

    pub fn remove_promo(&self, code: &str) -> bool {
        self.promos().remove(&normalize(code)).is_some()
    }

    pub fn find(&self, code: &str) -> Option<Promo> {
        self.promos().get(&normalize(code)).cloned()
    }

    /// All promos ordered by code.
    pub fn list(&self) -> Vec<Promo> {
        let mut promos: Vec<Promo> = self.promos().values().cloned().collect();
        promos.sort_by(|a, b| a.code.cmp(&b.code));
        promos
    }

    /// Discount `raw_fare` with `code`, consuming one use.
    ///
    /// Blank, unknown and exhausted codes leave the fare untouched and
    /// consume nothing. The lookup and the decrement happen under one lock.
    pub fn apply(&self, code: Option<&str>, raw_fare: f64) -> PromoDiscount {
        let Some(code) = code.map(normalize).filter(|c| !c.is_empty()) else {
            return PromoDiscount::none(raw_fare);
        };
        let mut promos = self.promos();
        let Some(promo) = promos.get_mut(&code) else {
            return PromoDiscount::none(raw_fare);
        };
        if promo.uses_left == 0 {
            return PromoDiscount::none(raw_fare);
        }
        promo.uses_left -= 1;
        let discount = raw_fare * promo.percent / 100.0;
        PromoDiscount {
            fare: raw_fare - discount,
            discount,
            code: Some(code),
        }
    }
}
