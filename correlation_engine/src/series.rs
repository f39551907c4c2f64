//! Dated multi-commodity price series

use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

/// Prices of every tracked commodity on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Observation date
    pub date: NaiveDate,
    /// Commodity name to price
    pub prices: BTreeMap<String, f64>,
}

impl TimeSeriesPoint {
    /// Price of a commodity on this date
    pub fn price(&self, commodity: &str) -> Option<f64> {
        self.prices.get(commodity).copied()
    }
}

/// Chronologically ordered price observations sampled on a shared date grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    commodities: Vec<String>,
    points: Vec<TimeSeriesPoint>,
}

impl PriceSeries {
    /// Create a series, checking that dates strictly increase and that every
    /// point carries a price for every commodity
    pub fn new(commodities: Vec<String>, points: Vec<TimeSeriesPoint>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in &commodities {
            if !seen.insert(name.as_str()) {
                return Err(EngineError::InvalidParameter(format!(
                    "Duplicate commodity '{}'",
                    name
                )));
            }
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(EngineError::DataError(format!(
                    "Dates must strictly increase: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        for point in &points {
            for name in &commodities {
                if !point.prices.contains_key(name) {
                    return Err(EngineError::MissingObservation {
                        commodity: name.clone(),
                        date: point.date,
                    });
                }
            }
        }

        Ok(Self {
            commodities,
            points,
        })
    }

    /// Tracked commodity names, in table order
    pub fn commodities(&self) -> &[String] {
        &self.commodities
    }

    /// All points
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Observation dates
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Date of the most recent point
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Whether the commodity is tracked by this series
    pub fn tracks(&self, commodity: &str) -> bool {
        self.commodities.iter().any(|c| c == commodity)
    }

    /// Price vector of one commodity across all dates
    pub fn prices_for(&self, commodity: &str) -> Result<Vec<f64>> {
        if !self.tracks(commodity) {
            return Err(EngineError::UnknownCommodity(commodity.to_string()));
        }

        self.points
            .iter()
            .map(|p| {
                p.price(commodity)
                    .ok_or_else(|| EngineError::MissingObservation {
                        commodity: commodity.to_string(),
                        date: p.date,
                    })
            })
            .collect()
    }

    /// Most recent prices
    pub fn latest_prices(&self) -> Option<&BTreeMap<String, f64>> {
        self.points.last().map(|p| &p.prices)
    }

    /// Get a sub-series by index range
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.points.len() {
            return Err(EngineError::InvalidParameter(format!(
                "Range {:?} out of bounds for series of length {}",
                range,
                self.points.len()
            )));
        }

        Ok(Self {
            commodities: self.commodities.clone(),
            points: self.points[range].to_vec(),
        })
    }

    /// Index at which the recent half starts
    pub fn midpoint(&self) -> usize {
        self.points.len() / 2
    }

    /// Split into the older half `[0, n/2)` and the recent half `[n/2, n)`.
    ///
    /// With an odd length the recent half holds the extra point.
    pub fn split_halves(&self) -> (Self, Self) {
        let mid = self.midpoint();
        let older = Self {
            commodities: self.commodities.clone(),
            points: self.points[..mid].to_vec(),
        };
        let recent = Self {
            commodities: self.commodities.clone(),
            points: self.points[mid..].to_vec(),
        };
        (older, recent)
    }
}
