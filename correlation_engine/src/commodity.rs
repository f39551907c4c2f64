//! Static commodity parameter table

use serde::{Deserialize, Serialize};

/// Parameters of one tracked commodity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityParams {
    /// Unique commodity name
    pub name: String,
    /// Starting price and anchor of the clamp band
    pub base_price: f64,
    /// Daily volatility as a fraction of price
    pub volatility: f64,
    /// Daily drift bias as a fraction of price
    pub drift: f64,
    /// Whether the commodity follows the shared market shock closely
    #[serde(default)]
    pub market_linked: bool,
}

impl CommodityParams {
    /// Create a commodity that is only loosely tied to the market shock
    pub fn new(name: &str, base_price: f64, volatility: f64, drift: f64) -> Self {
        Self {
            name: name.to_string(),
            base_price,
            volatility,
            drift,
            market_linked: false,
        }
    }

    /// Mark the commodity as broadly market-correlated
    pub fn market_linked(mut self) -> Self {
        self.market_linked = true;
        self
    }
}

pub const COCOA: &str = "Cocoa";
pub const SUGAR: &str = "Sugar";
pub const PALM_OIL: &str = "Palm Oil";
pub const COCOA_BUTTER: &str = "Cocoa Butter";
pub const MILK_POWDER: &str = "Milk Powder";
pub const HAZELNUTS: &str = "Hazelnuts";
pub const COFFEE: &str = "Coffee";
pub const WHEAT: &str = "Wheat";

/// The default table of commodities tracked by the dashboard.
///
/// Cocoa is the primary benchmark, Sugar the reference sweetener and Palm Oil
/// the reference oil; those three carry most of the shared market shock.
pub fn default_commodities() -> Vec<CommodityParams> {
    vec![
        CommodityParams::new(COCOA, 8500.0, 0.022, 0.0004).market_linked(),
        CommodityParams::new(SUGAR, 520.0, 0.015, 0.0001).market_linked(),
        CommodityParams::new(PALM_OIL, 950.0, 0.018, 0.0002).market_linked(),
        CommodityParams::new(COCOA_BUTTER, 11000.0, 0.020, 0.0003),
        CommodityParams::new(MILK_POWDER, 3300.0, 0.012, 0.0001),
        CommodityParams::new(HAZELNUTS, 7200.0, 0.016, 0.0002),
        CommodityParams::new(COFFEE, 4100.0, 0.021, 0.0002),
        CommodityParams::new(WHEAT, 240.0, 0.014, 0.0),
    ]
}

/// Names of the given commodities, in table order
pub fn commodity_names(params: &[CommodityParams]) -> Vec<String> {
    params.iter().map(|p| p.name.clone()).collect()
}
