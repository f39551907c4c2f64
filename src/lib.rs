//! # Commodity Lens
//!
//! Facade over the workspace crates: shared statistics (`corr_math`), the
//! multi-commodity correlation engine (`correlation_engine`) and the
//! two-leg spread utilities (`spread_trade`).
//!
//! ## Example
//!
//! ```
//! use commodity_lens_workspace::{pair_spread, CorrelationEngine, EngineConfig, SpreadRules};
//! use chrono::NaiveDate;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let engine = CorrelationEngine::new(EngineConfig::default())?;
//! let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//! let series = engine.generate_series_until(180, end, &mut StdRng::seed_from_u64(42))?;
//!
//! let spread = pair_spread(&series, "Cocoa Butter", "Palm Oil")?;
//! assert_eq!(spread.len(), 181);
//! assert!(!SpreadRules::default().evaluate(&spread).is_empty());
//! # Ok::<(), commodity_lens_workspace::LensError>(())
//! ```

pub use corr_math;
pub use correlation_engine;
pub use spread_trade;

pub use correlation_engine::{
    CorrelationEngine, CorrelationInsight, CorrelationReport, EngineConfig, EngineError,
    PriceSeries,
};
pub use spread_trade::{SignalAction, SpreadError, SpreadRules, SpreadSeries, SpreadSignal};

use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Errors from operations spanning the engine and spread crates
#[derive(Debug, Error)]
pub enum LensError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Spread(#[from] SpreadError),
}

/// Spread between two tracked commodities of a price series
pub fn pair_spread(
    series: &PriceSeries,
    first: &str,
    second: &str,
) -> Result<SpreadSeries, LensError> {
    let prices_a = series.prices_for(first)?;
    let prices_b = series.prices_for(second)?;

    Ok(SpreadSeries::from_prices(&series.dates(), &prices_a, &prices_b)?)
}

/// Install a compact INFO subscriber, overridable through `RUST_LOG`.
///
/// Returns false when a global subscriber is already set.
pub fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .compact()
        .try_init()
        .is_ok()
}
