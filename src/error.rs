//! Error types for wamdens operations.

use thiserror::Error;

/// Convenient result alias used across the crate.
pub type Result<T> = std::result::Result<T, WamdensError>;

/// All failure modes of a single density lookup.
///
/// Every error is terminal for the invocation that produced it: there is no
/// retry policy and no partial result. The binary maps any error to a
/// non-zero exit status with the diagnostic on the log channel.
#[derive(Error, Debug)]
pub enum WamdensError {
    /// No snapshot found within the catalog's time bounds while stepping
    /// outward from a rounded candidate.
    #[error("catalog exhausted: {0}")]
    CatalogExhausted(String),

    /// A snapshot violates the grid contract (missing variable, shape
    /// mismatch, non-monotonic axis).
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The query point lies outside the grid hull and extrapolation is
    /// disabled.
    #[error("query outside grid domain: {0}")]
    OutOfDomain(String),

    /// Invalid caller input, detected before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the NetCDF library.
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// A timestamp string failed to parse.
    #[error("time parse error: {0}")]
    TimeParse(#[from] chrono::ParseError),
}
