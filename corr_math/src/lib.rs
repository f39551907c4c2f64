//! # Corr Math
//!
//! Numeric primitives for commodity price analytics.
//! This crate provides the Pearson correlation coefficient with an explicit
//! "no signal" fallback, streaming window accumulators and the small
//! descriptive statistics the correlation engine is built on.

use thiserror::Error;

pub mod correlation;
pub mod moving_averages;
pub mod statistics;

pub use correlation::{pearson, try_pearson, RollingPearson, MIN_SAMPLES};
pub use moving_averages::{trailing_average, TrailingMean};
pub use statistics::{mean, round_to, sample_variance};

/// Errors that can occur in correlation and statistics calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sequences have different lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Zero variance in input, correlation is undefined")]
    ZeroVariance,
}

/// Result type for correlation math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::LengthMismatch { left: 3, right: 4 };
        assert_eq!(err.to_string(), "Sequences have different lengths: 3 vs 4");

        let err = MathError::InsufficientData("need 5 samples".to_string());
        assert!(err.to_string().contains("need 5 samples"));
    }
}
