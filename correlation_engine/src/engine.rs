//! Entry point composing generation, matrix, rolling and insight stages

use crate::cache::TtlCache;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::feed::{assemble_series, PriceObservation};
use crate::generator::SeriesGenerator;
use crate::insights::{rank_insights, CorrelationInsight};
use crate::matrix::{build_matrix, heatmap, CorrelationPair};
use crate::rolling::{compute_rolling, pivot_rolling, KeyPair, RollingCorrelation};
use crate::series::PriceSeries;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Everything the presentation layer renders for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Date of the most recent observation analysed
    pub generated_for: Option<NaiveDate>,
    /// Commodities in matrix order
    pub commodities: Vec<String>,
    pub matrix: Vec<CorrelationPair>,
    pub rolling: Vec<RollingCorrelation>,
    pub insights: Vec<CorrelationInsight>,
}

impl CorrelationReport {
    /// Matrix values as rows in commodity order
    pub fn heatmap(&self) -> Vec<Vec<f64>> {
        heatmap(&self.matrix, &self.commodities)
    }

    /// Rolling correlations grouped by date
    pub fn rolling_by_date(&self) -> BTreeMap<NaiveDate, BTreeMap<String, f64>> {
        pivot_rolling(&self.rolling)
    }
}

/// Commodity correlation analytics engine
#[derive(Debug, Clone)]
pub struct CorrelationEngine {
    config: EngineConfig,
    generator: SeriesGenerator,
    cache: TtlCache<String, CorrelationReport>,
}

impl CorrelationEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let generator = SeriesGenerator::new(config.commodities.clone(), config.generator.clone())?;
        let cache = TtlCache::with_ttl_secs(config.cache_ttl_secs);

        Ok(Self {
            config,
            generator,
            cache,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Synthetic series of `horizon + 1` days ending today
    pub fn generate_series<R: Rng + ?Sized>(
        &self,
        horizon: u32,
        rng: &mut R,
    ) -> Result<PriceSeries> {
        self.generator.generate(horizon, rng)
    }

    /// Synthetic series of `horizon + 1` days ending on `end`
    pub fn generate_series_until<R: Rng + ?Sized>(
        &self,
        horizon: u32,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<PriceSeries> {
        self.generator.generate_until(horizon, end, rng)
    }

    /// Build a series from historical observations using the configured gap policy
    pub fn series_from_feed(&self, observations: &[PriceObservation]) -> Result<PriceSeries> {
        assemble_series(
            observations,
            &self.config.commodity_names(),
            self.config.gap_policy,
        )
    }

    /// Run the matrix, rolling and insight stages over a series.
    ///
    /// The matrix covers the commodities the series tracks. Key pairs naming
    /// a commodity the series does not track are skipped.
    pub fn analyze(&self, series: &PriceSeries) -> Result<CorrelationReport> {
        let commodities = series.commodities().to_vec();
        let matrix = build_matrix(series, &commodities, &self.config.matrix)?;

        let key_pairs: Vec<KeyPair> = self
            .config
            .key_pairs
            .iter()
            .filter(|p| series.tracks(&p.first) && series.tracks(&p.second))
            .cloned()
            .collect();
        if key_pairs.len() < self.config.key_pairs.len() {
            debug!(
                skipped = self.config.key_pairs.len() - key_pairs.len(),
                "key pairs not tracked by series"
            );
        }
        let rolling = compute_rolling(series, &key_pairs, &self.config.rolling)?;
        let insights = rank_insights(&matrix, &self.config.insights);

        info!(
            points = series.len(),
            commodities = commodities.len(),
            pairs = matrix.len(),
            rolling = rolling.len(),
            insights = insights.len(),
            "correlation analysis complete"
        );

        Ok(CorrelationReport {
            generated_for: series.last_date(),
            commodities,
            matrix,
            rolling,
            insights,
        })
    }

    /// Generate a synthetic series ending on `end` and analyse it
    pub fn analyze_synthetic_until<R: Rng + ?Sized>(
        &self,
        horizon: u32,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<CorrelationReport> {
        let series = self.generate_series_until(horizon, end, rng)?;
        self.analyze(&series)
    }

    /// Generate a synthetic series ending today and analyse it
    pub fn analyze_synthetic<R: Rng + ?Sized>(
        &self,
        horizon: u32,
        rng: &mut R,
    ) -> Result<CorrelationReport> {
        let series = self.generate_series(horizon, rng)?;
        self.analyze(&series)
    }

    /// Synthetic analysis memoized per horizon, as of `now`
    pub fn cached_analysis_at<R: Rng + ?Sized>(
        &mut self,
        horizon: u32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<CorrelationReport> {
        let key = format!("correlation:{}", horizon);
        if let Some(report) = self.cache.get_at(&key, now) {
            return Ok(report.clone());
        }

        let report = self.analyze_synthetic_until(horizon, now.date_naive(), rng)?;
        self.cache.insert_at(key, report.clone(), now);
        Ok(report)
    }

    /// Synthetic analysis memoized per horizon
    pub fn cached_analysis<R: Rng + ?Sized>(
        &mut self,
        horizon: u32,
        rng: &mut R,
    ) -> Result<CorrelationReport> {
        self.cached_analysis_at(horizon, Utc::now(), rng)
    }

    /// Drop every cached report
    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_analyze_synthetic_shape() {
        let engine = CorrelationEngine::new(EngineConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let report = engine.analyze_synthetic_until(179, end_date(), &mut rng).unwrap();

        assert_eq!(report.generated_for, Some(end_date()));
        assert_eq!(report.matrix.len(), 64);
        // 180 points, window 30, stride 3 -> 51 windows per key pair
        assert_eq!(report.rolling.len(), 51 * 5);
        assert!(!report.insights.is_empty());
        assert_eq!(report.heatmap().len(), 8);
        assert_eq!(report.rolling_by_date().len(), 51);
    }

    #[test]
    fn test_cached_analysis() {
        let mut engine = CorrelationEngine::new(EngineConfig::default()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap();

        let first = engine
            .cached_analysis_at(90, now, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let cached = engine
            .cached_analysis_at(90, now + Duration::seconds(10), &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_eq!(first, cached);

        let refreshed = engine
            .cached_analysis_at(90, now + Duration::seconds(301), &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_ne!(first, refreshed);

        engine.invalidate_cache();
        let recomputed = engine
            .cached_analysis_at(90, now + Duration::seconds(302), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(first, recomputed);
    }
}
