//! Synthetic correlated price history
//!
//! Used when no historical feed is available. Every day one shared market
//! shock is drawn; each commodity blends it with its own idiosyncratic draw,
//! weighted by whether the commodity is market-linked. Prices are kept inside
//! a band around their base so long horizons do not run away.

use crate::commodity::{commodity_names, CommodityParams};
use crate::error::{EngineError, Result};
use crate::series::{PriceSeries, TimeSeriesPoint};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Series generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Weight of the shared shock for market-linked commodities
    pub market_weight: f64,
    /// Weight of the shared shock for every other commodity
    pub idiosyncratic_weight: f64,
    /// Lower clamp as a multiple of base price
    pub clamp_floor: f64,
    /// Upper clamp as a multiple of base price
    pub clamp_ceiling: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            market_weight: 0.7,
            idiosyncratic_weight: 0.3,
            clamp_floor: 0.6,
            clamp_ceiling: 1.5,
        }
    }
}

impl GeneratorConfig {
    /// Check weights and the clamp band
    pub fn validate(&self) -> Result<()> {
        for (label, w) in [
            ("market_weight", self.market_weight),
            ("idiosyncratic_weight", self.idiosyncratic_weight),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(EngineError::InvalidParameter(format!(
                    "{} must be within [0, 1], got {}",
                    label, w
                )));
            }
        }
        if !(self.clamp_floor > 0.0 && self.clamp_floor <= 1.0 && self.clamp_ceiling >= 1.0) {
            return Err(EngineError::InvalidParameter(format!(
                "Clamp band [{}, {}] must be positive and contain 1.0",
                self.clamp_floor, self.clamp_ceiling
            )));
        }
        Ok(())
    }
}

/// Generator of correlated daily price histories
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    params: Vec<CommodityParams>,
    config: GeneratorConfig,
}

impl SeriesGenerator {
    /// Create a generator over a commodity table
    pub fn new(params: Vec<CommodityParams>, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        for p in &params {
            if !seen.insert(p.name.as_str()) {
                return Err(EngineError::InvalidParameter(format!(
                    "Duplicate commodity '{}'",
                    p.name
                )));
            }
            if !(p.base_price.is_finite() && p.base_price > 0.0) {
                return Err(EngineError::InvalidParameter(format!(
                    "Base price of {} must be positive",
                    p.name
                )));
            }
            if !(p.volatility.is_finite() && p.volatility >= 0.0) || !p.drift.is_finite() {
                return Err(EngineError::InvalidParameter(format!(
                    "Volatility and drift of {} must be finite, volatility non-negative",
                    p.name
                )));
            }
        }

        Ok(Self { params, config })
    }

    /// Commodity table driving this generator
    pub fn params(&self) -> &[CommodityParams] {
        &self.params
    }

    /// Generate `horizon + 1` daily points ending today (UTC)
    pub fn generate<R: Rng + ?Sized>(&self, horizon: u32, rng: &mut R) -> Result<PriceSeries> {
        self.generate_until(horizon, Utc::now().date_naive(), rng)
    }

    /// Generate `horizon + 1` daily points from `end - horizon` through `end`
    pub fn generate_until<R: Rng + ?Sized>(
        &self,
        horizon: u32,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<PriceSeries> {
        let start = end
            .checked_sub_days(Days::new(u64::from(horizon)))
            .ok_or_else(|| {
                EngineError::InvalidParameter(format!(
                    "Horizon of {} days is out of range",
                    horizon
                ))
            })?;

        let mut running: Vec<f64> = self.params.iter().map(|p| p.base_price).collect();
        let mut points = Vec::with_capacity(horizon as usize + 1);

        for day in 0..=u64::from(horizon) {
            let date = start + Days::new(day);
            let shock: f64 = StandardNormal.sample(rng);
            let mut prices = BTreeMap::new();

            for (param, price) in self.params.iter().zip(running.iter_mut()) {
                let idio: f64 = StandardNormal.sample(rng);
                let weight = if param.market_linked {
                    self.config.market_weight
                } else {
                    self.config.idiosyncratic_weight
                };
                // Keeps the blended draw at unit variance for any weight
                let blended = weight * shock + (1.0 - weight * weight).sqrt() * idio;
                let daily_return = param.drift + param.volatility * blended;

                *price = (*price * (1.0 + daily_return)).clamp(
                    param.base_price * self.config.clamp_floor,
                    param.base_price * self.config.clamp_ceiling,
                );
                prices.insert(param.name.clone(), price.round());
            }

            points.push(TimeSeriesPoint { date, prices });
        }

        debug!(
            horizon,
            commodities = self.params.len(),
            %start,
            %end,
            "generated synthetic price series"
        );

        PriceSeries::new(commodity_names(&self.params), points)
    }
}
