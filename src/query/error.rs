//! Error types for query-state construction.

use thiserror::Error;

/// Errors that can occur building a query snapshot.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Window bounds reversed
    #[error("time window start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    /// Page size must be positive
    #[error("limit must be at least 1")]
    ZeroLimit,

    /// Unknown grouping or interval keyword
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
