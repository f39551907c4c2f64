//! Error types for the correlation_engine crate

use chrono::NaiveDate;
use corr_math::MathError;
use thiserror::Error;

/// Custom error types for the correlation_engine crate
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error from invalid parameters or configuration values
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A commodity name that the series or table does not track
    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),

    /// Error related to price series validation
    #[error("Data error: {0}")]
    DataError(String),

    /// A historical feed is missing a price under the fail-fast gap policy
    #[error("Missing observation for {commodity} on {date}")]
    MissingObservation { commodity: String, date: NaiveDate },

    /// A historical feed produced no usable date
    #[error("Price feed contains no complete observation dates")]
    EmptyFeed,

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from configuration parsing
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, EngineError>;
