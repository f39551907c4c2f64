//! Price difference between two legs

use crate::pair_generator::PairPoint;
use crate::{Result, SpreadError};
use chrono::NaiveDate;
use corr_math::{pearson, round_to};
use serde::{Deserialize, Serialize};

/// Both leg prices and their difference on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadPoint {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
    /// `price_a - price_b`
    pub spread: f64,
}

/// Chronological spread history of a commodity pair
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpreadSeries {
    points: Vec<SpreadPoint>,
}

impl SpreadSeries {
    /// Build from parallel date and price vectors
    pub fn from_prices(dates: &[NaiveDate], prices_a: &[f64], prices_b: &[f64]) -> Result<Self> {
        if dates.len() != prices_a.len() || dates.len() != prices_b.len() {
            return Err(SpreadError::LengthMismatch(
                dates.len(),
                prices_a.len(),
                prices_b.len(),
            ));
        }
        if dates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SpreadError::InvalidData(
                "Dates must strictly increase".to_string(),
            ));
        }

        let points = dates
            .iter()
            .zip(prices_a.iter().zip(prices_b))
            .map(|(&date, (&a, &b))| SpreadPoint {
                date,
                price_a: a,
                price_b: b,
                spread: round_to(a - b, 2),
            })
            .collect();

        Ok(Self { points })
    }

    /// Build from generated pair points
    pub fn from_pair_points(points: &[PairPoint]) -> Self {
        Self {
            points: points
                .iter()
                .map(|p| SpreadPoint {
                    date: p.date,
                    price_a: p.price_a,
                    price_b: p.price_b,
                    spread: round_to(p.price_a - p.price_b, 2),
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[SpreadPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Spread values in date order
    pub fn spreads(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.spread).collect()
    }

    /// Most recent point
    pub fn latest(&self) -> Option<&SpreadPoint> {
        self.points.last()
    }

    /// Pearson correlation of the two legs' prices, rounded to 3 decimals
    pub fn leg_correlation(&self) -> f64 {
        let a: Vec<f64> = self.points.iter().map(|p| p.price_a).collect();
        let b: Vec<f64> = self.points.iter().map(|p| p.price_b).collect();
        round_to(pearson(&a, &b), 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Days;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + Days::new(i as u64)).collect()
    }

    #[test]
    fn test_spread_values() {
        let prices_a = [11000.0, 11050.5, 10990.0];
        let prices_b = [950.0, 960.25, 940.0];
        let series = SpreadSeries::from_prices(&dates(3), &prices_a, &prices_b).unwrap();
        assert_eq!(series.spreads(), vec![10050.0, 10090.25, 10050.0]);

        let latest = series.latest().unwrap();
        assert_eq!(latest.date, dates(3)[2]);
        assert_relative_eq!(latest.price_a - latest.price_b, latest.spread);
    }

    #[test]
    fn test_length_mismatch() {
        let err = SpreadSeries::from_prices(&dates(3), &[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SpreadError::LengthMismatch(3, 3, 2)));
    }

    #[test]
    fn test_leg_correlation() {
        let a: Vec<f64> = (0..10).map(|i| 100.0 + (i * 3 % 7) as f64).collect();
        let b: Vec<f64> = a.iter().map(|v| v * 0.5 + 10.0).collect();
        let series = SpreadSeries::from_prices(&dates(10), &a, &b).unwrap();
        assert_eq!(series.leg_correlation(), 1.0);
    }
}
