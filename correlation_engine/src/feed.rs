//! Historical price feed assembly
//!
//! Turns loose `(date, commodity, price)` observations into a `PriceSeries`
//! on a shared date grid, so the matrix, rolling and insight stages can run
//! on real prices instead of the synthetic generator.

use crate::error::{EngineError, Result};
use crate::series::{PriceSeries, TimeSeriesPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// One observed price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub commodity: String,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, commodity: &str, price: f64) -> Self {
        Self {
            date,
            commodity: commodity.to_string(),
            price,
        }
    }
}

/// What to do when a commodity has no price on a date another commodity has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Carry the last known price forward; dates before a commodity's first
    /// observation are dropped
    #[default]
    ForwardFill,
    /// Drop any date that is missing any commodity
    DropDate,
    /// Reject the feed
    Fail,
}

/// Read observations from CSV with a `date,commodity,price` header
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<PriceObservation>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for record in csv_reader.deserialize() {
        observations.push(record?);
    }
    Ok(observations)
}

/// Load observations from a CSV file
pub fn load_observations_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceObservation>> {
    let file = File::open(path)?;
    read_observations(file)
}

/// Assemble observations for the given commodities into a price series.
///
/// Observations for other commodities are ignored; for duplicate
/// `(date, commodity)` observations the last one wins.
pub fn assemble_series(
    observations: &[PriceObservation],
    commodities: &[String],
    policy: GapPolicy,
) -> Result<PriceSeries> {
    let tracked: HashSet<&str> = commodities.iter().map(String::as_str).collect();
    let mut grid: BTreeMap<NaiveDate, HashMap<&str, f64>> = BTreeMap::new();
    let mut ignored = 0usize;

    for obs in observations {
        if !tracked.contains(obs.commodity.as_str()) {
            ignored += 1;
            continue;
        }
        if !obs.price.is_finite() {
            return Err(EngineError::DataError(format!(
                "Non-finite price for {} on {}",
                obs.commodity, obs.date
            )));
        }
        grid.entry(obs.date)
            .or_default()
            .insert(obs.commodity.as_str(), obs.price);
    }

    if ignored > 0 {
        debug!(ignored, "skipped observations for untracked commodities");
    }
    if grid.is_empty() {
        return Err(EngineError::EmptyFeed);
    }

    let mut last_known: HashMap<&str, f64> = HashMap::new();
    let mut points = Vec::with_capacity(grid.len());

    'dates: for (date, observed) in &grid {
        let mut prices = BTreeMap::new();
        let mut complete = true;

        for name in commodities {
            let name = name.as_str();
            match observed.get(name) {
                Some(&price) => {
                    last_known.insert(name, price);
                    prices.insert(name.to_string(), price);
                }
                None => match policy {
                    GapPolicy::Fail => {
                        return Err(EngineError::MissingObservation {
                            commodity: name.to_string(),
                            date: *date,
                        });
                    }
                    GapPolicy::DropDate => {
                        warn!(%date, commodity = name, "dropping date with missing observation");
                        continue 'dates;
                    }
                    GapPolicy::ForwardFill => match last_known.get(name) {
                        Some(&price) => {
                            warn!(
                                %date,
                                commodity = name,
                                price,
                                "forward-filled missing observation"
                            );
                            prices.insert(name.to_string(), price);
                        }
                        None => complete = false,
                    },
                },
            }
        }

        if complete {
            points.push(TimeSeriesPoint {
                date: *date,
                prices,
            });
        } else {
            warn!(%date, "dropping date before first observation of every commodity");
        }
    }

    if points.is_empty() {
        return Err(EngineError::EmptyFeed);
    }

    debug!(
        dates = grid.len(),
        points = points.len(),
        ?policy,
        "assembled historical price series"
    );

    PriceSeries::new(commodities.to_vec(), points)
}
