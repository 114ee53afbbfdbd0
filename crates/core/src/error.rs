//! Error types for geonear

use thiserror::Error;

/// Main error type for geonear operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("coordinate value at position {index} is not finite: {value}")]
    InvalidCoordinate { index: usize, value: f64 },

    #[error("{what}: expected {expected} values, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no base points loaded")]
    EmptyBase,

    #[error("missing coordinates: {0}")]
    MissingCoordinates(&'static str),

    #[error("no field values loaded")]
    MissingValues,

    #[error("unsupported interpolation method: {0:?}")]
    UnsupportedMethod(String),

    #[error("ellipsoidal conversion requires the `ellipsoid` feature")]
    EllipsoidUnavailable,
}

/// Result type alias for geonear operations
pub type Result<T> = std::result::Result<T, Error>;
