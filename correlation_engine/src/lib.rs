//! # Correlation Engine
//!
//! Commodity correlation analytics for a multi-commodity purchasing
//! dashboard.
//!
//! ## Features
//!
//! - Correlated synthetic price histories driven by a shared market shock
//! - Historical feed assembly with an explicit gap policy
//! - Full pairwise correlation matrix with significance and trend buckets
//! - Rolling window correlation for a curated set of key pairs
//! - Ranked natural-language insights (strongest, weakest, divergence, opportunity)
//! - A TTL cache for memoizing whole reports
//!
//! ## Quick Start
//!
//! ```rust
//! use correlation_engine::{CorrelationEngine, EngineConfig};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let engine = CorrelationEngine::new(EngineConfig::default())?;
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let report = engine.analyze_synthetic(180, &mut rng)?;
//! for insight in &report.insights {
//!     println!("{}: {}", insight.title, insight.description);
//! }
//! # Ok::<(), correlation_engine::EngineError>(())
//! ```

pub mod cache;
pub mod commodity;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod generator;
pub mod insights;
pub mod matrix;
pub mod rolling;
pub mod series;

// Re-export commonly used types
pub use crate::cache::TtlCache;
pub use crate::commodity::{default_commodities, CommodityParams};
pub use crate::config::EngineConfig;
pub use crate::engine::{CorrelationEngine, CorrelationReport};
pub use crate::error::{EngineError, Result};
pub use crate::feed::{assemble_series, GapPolicy, PriceObservation};
pub use crate::generator::{GeneratorConfig, SeriesGenerator};
pub use crate::insights::{rank_insights, CorrelationInsight, InsightConfig, InsightKind, PairKey};
pub use crate::matrix::{build_matrix, CorrelationPair, MatrixConfig, Significance, Trend};
pub use crate::rolling::{compute_rolling, KeyPair, RollingConfig, RollingCorrelation};
pub use crate::series::{PriceSeries, TimeSeriesPoint};
