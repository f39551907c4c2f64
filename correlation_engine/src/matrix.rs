//! Pairwise correlation matrix with significance and trend classification

use crate::error::{EngineError, Result};
use crate::series::PriceSeries;
use corr_math::{pearson, round_to};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Coarse bucket of the absolute correlation value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Strong,
    Moderate,
    Weak,
    None,
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Significance::Strong => write!(f, "strong"),
            Significance::Moderate => write!(f, "moderate"),
            Significance::Weak => write!(f, "weak"),
            Significance::None => write!(f, "none"),
        }
    }
}

/// Direction of a correlation between the older and recent period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Classification thresholds for the matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Minimum |r| for a strong relationship
    pub strong_threshold: f64,
    /// Minimum |r| for a moderate relationship
    pub moderate_threshold: f64,
    /// Minimum |r| for a weak relationship
    pub weak_threshold: f64,
    /// Change in r beyond which the trend is rising or falling
    pub trend_epsilon: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            strong_threshold: 0.7,
            moderate_threshold: 0.4,
            weak_threshold: 0.2,
            trend_epsilon: 0.05,
        }
    }
}

impl MatrixConfig {
    /// Check that thresholds are ordered and inside [0, 1]
    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.weak_threshold
            && self.weak_threshold <= self.moderate_threshold
            && self.moderate_threshold <= self.strong_threshold
            && self.strong_threshold <= 1.0;
        if !ordered {
            return Err(EngineError::InvalidParameter(format!(
                "Significance thresholds must satisfy \
                 0 <= weak ({}) <= moderate ({}) <= strong ({}) <= 1",
                self.weak_threshold, self.moderate_threshold, self.strong_threshold
            )));
        }
        if self.trend_epsilon.is_nan() || self.trend_epsilon < 0.0 {
            return Err(EngineError::InvalidParameter(
                "Trend epsilon must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Bucket a correlation value by its magnitude
    pub fn significance(&self, value: f64) -> Significance {
        let magnitude = value.abs();
        if magnitude >= self.strong_threshold {
            Significance::Strong
        } else if magnitude >= self.moderate_threshold {
            Significance::Moderate
        } else if magnitude >= self.weak_threshold {
            Significance::Weak
        } else {
            Significance::None
        }
    }

    /// Classify the move from the previous to the current correlation
    pub fn trend(&self, current: f64, previous: f64) -> Trend {
        let delta = current - previous;
        if delta > self.trend_epsilon {
            Trend::Rising
        } else if delta < -self.trend_epsilon {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

/// One cell of the correlation matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub x: String,
    pub y: String,
    /// Correlation over the recent half, rounded to 3 decimals
    pub value: f64,
    pub significance: Significance,
    pub trend: Trend,
    /// Correlation over the older half, rounded to 3 decimals
    pub previous: f64,
}

impl CorrelationPair {
    /// True for diagonal cells
    pub fn is_self_pair(&self) -> bool {
        self.x == self.y
    }

    /// Current minus previous correlation
    pub fn delta(&self) -> f64 {
        self.value - self.previous
    }
}

/// Build the full ordered-pair correlation matrix.
///
/// The series is split at its index midpoint; the recent half gives the
/// current value and the older half the previous one. Cells are returned
/// row-major in the order of `commodities`, diagonal included.
pub fn build_matrix(
    series: &PriceSeries,
    commodities: &[String],
    config: &MatrixConfig,
) -> Result<Vec<CorrelationPair>> {
    let mid = series.midpoint();
    let mut columns: HashMap<&str, Vec<f64>> = HashMap::with_capacity(commodities.len());
    for name in commodities {
        columns.insert(name.as_str(), series.prices_for(name)?);
    }

    let mut pairs = Vec::with_capacity(commodities.len() * commodities.len());
    for x in commodities {
        for y in commodities {
            if x == y {
                pairs.push(CorrelationPair {
                    x: x.clone(),
                    y: y.clone(),
                    value: 1.0,
                    significance: Significance::Strong,
                    trend: Trend::Stable,
                    previous: 1.0,
                });
                continue;
            }

            let xs = &columns[x.as_str()];
            let ys = &columns[y.as_str()];
            let value = round_to(pearson(&xs[mid..], &ys[mid..]), 3);
            let previous = round_to(pearson(&xs[..mid], &ys[..mid]), 3);

            pairs.push(CorrelationPair {
                x: x.clone(),
                y: y.clone(),
                value,
                significance: config.significance(value),
                trend: config.trend(value, previous),
                previous,
            });
        }
    }

    debug!(
        commodities = commodities.len(),
        points = series.len(),
        pairs = pairs.len(),
        "built correlation matrix"
    );

    Ok(pairs)
}

/// Pivot the flat matrix into row-major rows of values, in `commodities` order.
///
/// Cells missing from `pairs` are reported as `0.0`.
pub fn heatmap(pairs: &[CorrelationPair], commodities: &[String]) -> Vec<Vec<f64>> {
    let lookup: HashMap<(&str, &str), f64> = pairs
        .iter()
        .map(|p| ((p.x.as_str(), p.y.as_str()), p.value))
        .collect();

    commodities
        .iter()
        .map(|x| {
            commodities
                .iter()
                .map(|y| lookup.get(&(x.as_str(), y.as_str())).copied().unwrap_or(0.0))
                .collect()
        })
        .collect()
}
