//! Rolling window correlation for a curated set of commodity pairs

use crate::error::{EngineError, Result};
use crate::series::PriceSeries;
use chrono::NaiveDate;
use corr_math::{round_to, RollingPearson, MIN_SAMPLES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A pair of commodities whose rolling correlation is charted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPair {
    pub first: String,
    pub second: String,
}

impl KeyPair {
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Display label, formatted "A / B"
    pub fn label(&self) -> String {
        format!("{} / {}", self.first, self.second)
    }
}

/// Window and stride of the rolling computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Number of trailing samples per correlation
    pub window: usize,
    /// Samples between successive windows
    pub stride: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window: 30,
            stride: 3,
        }
    }
}

impl RollingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window < MIN_SAMPLES {
            return Err(EngineError::InvalidParameter(format!(
                "Rolling window must be at least {}, got {}",
                MIN_SAMPLES, self.window
            )));
        }
        if self.stride == 0 {
            return Err(EngineError::InvalidParameter(
                "Rolling stride must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of windows emitted per pair for a series of `len` points
    pub fn sample_count(&self, len: usize) -> usize {
        if len < self.window || self.stride == 0 {
            0
        } else {
            (len - self.window) / self.stride + 1
        }
    }
}

/// Correlation of one key pair over the window ending on `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingCorrelation {
    pub date: NaiveDate,
    /// Pair label, "A / B"
    pub pair: String,
    /// Correlation rounded to 3 decimals
    pub value: f64,
}

/// Compute rolling correlations for every key pair.
///
/// Windows end at sample counts `window, window + stride, ...` up to the
/// series length; each entry is dated with the rightmost point of its window.
/// Entries are ordered by date, then by key pair order.
pub fn compute_rolling(
    series: &PriceSeries,
    key_pairs: &[KeyPair],
    config: &RollingConfig,
) -> Result<Vec<RollingCorrelation>> {
    config.validate()?;

    let mut tracks = Vec::with_capacity(key_pairs.len());
    for pair in key_pairs {
        let first = series.prices_for(&pair.first)?;
        let second = series.prices_for(&pair.second)?;
        tracks.push((pair.label(), first, second, RollingPearson::new(config.window)?));
    }

    let mut entries = Vec::with_capacity(config.sample_count(series.len()) * key_pairs.len());
    for (i, point) in series.points().iter().enumerate() {
        let seen = i + 1;
        let at_stop = seen >= config.window && (seen - config.window) % config.stride == 0;

        for (label, first, second, rolling) in tracks.iter_mut() {
            rolling.update(first[i], second[i]);
            if at_stop {
                entries.push(RollingCorrelation {
                    date: point.date,
                    pair: label.clone(),
                    value: round_to(rolling.value(), 3),
                });
            }
        }
    }

    debug!(
        pairs = key_pairs.len(),
        window = config.window,
        stride = config.stride,
        entries = entries.len(),
        "computed rolling correlations"
    );

    Ok(entries)
}

/// Group rolling entries by date for line charts: date -> pair label -> value
pub fn pivot_rolling(
    entries: &[RollingCorrelation],
) -> BTreeMap<NaiveDate, BTreeMap<String, f64>> {
    let mut pivot: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    for entry in entries {
        pivot
            .entry(entry.date)
            .or_default()
            .insert(entry.pair.clone(), entry.value);
    }
    pivot
}
