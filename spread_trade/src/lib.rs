//! # Spread Trade
//!
//! `spread_trade` covers the two-commodity special case of the correlation
//! dashboard: a directly generated correlated price pair, the spread between
//! the two legs, and coarse purchasing signals from trailing averages.
//!
//! ## Usage Example
//!
//! ```no_run
//! use spread_trade::{PairGenerator, SpreadSeries, SpreadRules};
//!
//! let mut rng = rand::thread_rng();
//! let points = PairGenerator::default().generate(180, &mut rng).unwrap();
//! let spread = SpreadSeries::from_pair_points(&points);
//!
//! for signal in SpreadRules::default().evaluate(&spread) {
//!     println!("{} ({:.1}): {}", signal.action, signal.strength, signal.message);
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod pair_generator;
pub mod signals;
pub mod spread;

pub use pair_generator::{PairGenerator, PairPoint};
pub use signals::{SpreadRules, SpreadSignal};
pub use spread::{SpreadPoint, SpreadSeries};

/// Errors that can occur in spread operations
#[derive(Error, Debug)]
pub enum SpreadError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Parameter validation error: {0}")]
    ParameterError(String),

    #[error("Series lengths differ: {0} dates, {1} first-leg prices, {2} second-leg prices")]
    LengthMismatch(usize, usize, usize),
}

/// Result type for spread operations
pub type Result<T> = std::result::Result<T, SpreadError>;

/// Recommended purchasing action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    /// Favour buying the first leg now
    Buy,
    /// Defer purchases
    Hold,
    /// Nothing actionable
    Neutral,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "Buy"),
            SignalAction::Hold => write!(f, "Hold"),
            SignalAction::Neutral => write!(f, "Neutral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(SignalAction::Buy.to_string(), "Buy");
        assert_eq!(SignalAction::Neutral.to_string(), "Neutral");
    }

    #[test]
    fn test_error_display() {
        let err = SpreadError::LengthMismatch(3, 3, 2);
        assert!(err.to_string().contains("2 second-leg prices"));
    }
}
