//! Error types for the collection engine

use thiserror::Error;

/// Collector-level errors
///
/// Fallible operations inside a collector classify their failure with
/// one of these variants and their callers contain it at the
/// measurement boundary, so expected failures never escape `collect`.
/// An error that does escape a whole collector is counted by the
/// runner under the `general_error` kind.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The backend could not be reached at all
    #[error("Connection error: {0}")]
    Connection(String),

    /// A store query failed after the connectivity probe passed
    #[error("Query error: {0}")]
    Query(String),

    /// The remote API answered with an error status or bad payload
    #[error("API error: {0}")]
    Api(String),
}

/// Result type alias for collector operations
pub type CollectorResult<T> = Result<T, CollectorError>;
