//! Directly generated correlated price pair
//!
//! A reduced form of the multi-commodity generator: two legs whose daily
//! shocks share a fixed correlation.

use crate::{Result, SpreadError};
use chrono::{Days, NaiveDate, Utc};
use corr_math::round_to;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Prices of both legs on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPoint {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
}

/// Generator of a correlated two-commodity price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairGenerator {
    /// Starting price of the first leg
    pub base_a: f64,
    /// Starting price of the second leg
    pub base_b: f64,
    /// Daily volatility of the first leg
    pub vol_a: f64,
    /// Daily volatility of the second leg
    pub vol_b: f64,
    /// Correlation of the daily shocks, in [-1, 1]
    pub correlation: f64,
}

impl Default for PairGenerator {
    /// Cocoa butter against palm oil
    fn default() -> Self {
        Self {
            base_a: 11000.0,
            base_b: 950.0,
            vol_a: 0.02,
            vol_b: 0.018,
            correlation: 0.6,
        }
    }
}

impl PairGenerator {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_a > 0.0 && self.base_b > 0.0) {
            return Err(SpreadError::ParameterError(
                "Base prices must be positive".to_string(),
            ));
        }
        if !(self.vol_a >= 0.0 && self.vol_b >= 0.0) {
            return Err(SpreadError::ParameterError(
                "Volatilities must be non-negative".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.correlation) {
            return Err(SpreadError::ParameterError(format!(
                "Correlation must be within [-1, 1], got {}",
                self.correlation
            )));
        }
        Ok(())
    }

    /// Generate `days + 1` points ending today (UTC)
    pub fn generate<R: Rng + ?Sized>(&self, days: u32, rng: &mut R) -> Result<Vec<PairPoint>> {
        self.generate_until(days, Utc::now().date_naive(), rng)
    }

    /// Generate `days + 1` points ending on `end`
    pub fn generate_until<R: Rng + ?Sized>(
        &self,
        days: u32,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<PairPoint>> {
        self.validate()?;
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| SpreadError::ParameterError(format!("{} days is out of range", days)))?;

        let rho = self.correlation;
        let mut price_a = self.base_a;
        let mut price_b = self.base_b;
        let mut points = Vec::with_capacity(days as usize + 1);

        for day in 0..=u64::from(days) {
            let z_a: f64 = StandardNormal.sample(rng);
            let e: f64 = StandardNormal.sample(rng);
            let z_b = rho * z_a + (1.0 - rho * rho).sqrt() * e;

            price_a = (price_a * (1.0 + self.vol_a * z_a)).max(0.01);
            price_b = (price_b * (1.0 + self.vol_b * z_b)).max(0.01);

            points.push(PairPoint {
                date: start + Days::new(day),
                price_a: round_to(price_a, 2),
                price_b: round_to(price_b, 2),
            });
        }

        Ok(points)
    }
}
