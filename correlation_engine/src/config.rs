//! Engine configuration
//!
//! Every field has a default, so a JSON document only needs to name what it
//! overrides:
//!
//! ```
//! use correlation_engine::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "rolling": { "window": 20 } }"#).unwrap();
//! assert_eq!(config.rolling.window, 20);
//! assert_eq!(config.rolling.stride, 3);
//! ```

use crate::commodity::{
    commodity_names, default_commodities, CommodityParams, COCOA, COCOA_BUTTER, HAZELNUTS,
    MILK_POWDER, PALM_OIL, SUGAR, WHEAT,
};
use crate::error::{EngineError, Result};
use crate::feed::GapPolicy;
use crate::generator::GeneratorConfig;
use crate::insights::InsightConfig;
use crate::matrix::MatrixConfig;
use crate::rolling::{KeyPair, RollingConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default curated pairs for rolling correlation charts
pub fn default_key_pairs() -> Vec<KeyPair> {
    vec![
        KeyPair::new(COCOA, COCOA_BUTTER),
        KeyPair::new(COCOA, SUGAR),
        KeyPair::new(COCOA_BUTTER, PALM_OIL),
        KeyPair::new(SUGAR, WHEAT),
        KeyPair::new(MILK_POWDER, HAZELNUTS),
    ]
}

/// Complete configuration of the correlation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tracked commodities
    pub commodities: Vec<CommodityParams>,
    /// Pairs charted by the rolling window computer
    pub key_pairs: Vec<KeyPair>,
    /// Days of synthetic history when the caller does not specify one
    pub default_horizon: u32,
    pub generator: GeneratorConfig,
    pub matrix: MatrixConfig,
    pub rolling: RollingConfig,
    pub insights: InsightConfig,
    /// Handling of gaps in historical feeds
    pub gap_policy: GapPolicy,
    /// Lifetime of cached reports, in seconds
    pub cache_ttl_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commodities: default_commodities(),
            key_pairs: default_key_pairs(),
            default_horizon: 180,
            generator: GeneratorConfig::default(),
            matrix: MatrixConfig::default(),
            rolling: RollingConfig::default(),
            insights: InsightConfig::default(),
            gap_policy: GapPolicy::default(),
            cache_ttl_secs: 300,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Names of the tracked commodities, in table order
    pub fn commodity_names(&self) -> Vec<String> {
        commodity_names(&self.commodities)
    }

    /// Check every section and cross-references between them
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.matrix.validate()?;
        self.rolling.validate()?;
        self.insights.validate()?;

        let mut names = HashSet::new();
        for commodity in &self.commodities {
            if !names.insert(commodity.name.as_str()) {
                return Err(EngineError::InvalidParameter(format!(
                    "Duplicate commodity '{}'",
                    commodity.name
                )));
            }
            if !(commodity.base_price.is_finite() && commodity.base_price > 0.0) {
                return Err(EngineError::InvalidParameter(format!(
                    "Base price of {} must be positive",
                    commodity.name
                )));
            }
        }

        // an untracked opportunity pair only suppresses that insight
        for pair in &self.key_pairs {
            for name in [&pair.first, &pair.second] {
                if !names.contains(name.as_str()) {
                    return Err(EngineError::UnknownCommodity(name.clone()));
                }
            }
        }

        Ok(())
    }
}
