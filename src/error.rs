// src/error.rs

use thiserror::Error;

/// A generation config that breaks one of its invariants.
///
/// Variants are listed in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("min-mass must be positive")]
    MinMassNotPositive,

    #[error("max-mass must be greater than or equal to the min-mass")]
    MaxMassBelowMin,

    #[error("mass must be positive")]
    MassNotPositive,

    #[error("max-position must be greater than the min-position")]
    PositionRangeEmpty,

    #[error("min-velocity must be non-negative")]
    MinVelocityNegative,

    #[error("max-velocity must be greater than or equal to the min-velocity")]
    MaxVelocityBelowMin,

    #[error("velocity must be non-negative")]
    VelocityNegative,
}

/// Structural mismatch between a dataset and what a tool expects of it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("expected a 2-D matrix, got shape {0:?}")]
    NotTwoDimensional(Vec<usize>),

    #[error("data file doesn't have 3 values per body ({cols} columns)")]
    NotThreePerBody { cols: usize },

    #[error("expected {expected} columns, got {actual}")]
    Columns { expected: usize, actual: usize },

    #[error("expected {expected} rows, got {actual}")]
    Rows { expected: usize, actual: usize },

    #[error("must have at least 1 row")]
    Empty,

    #[error("body {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("data length {len} does not match shape {shape:?}")]
    Length { len: usize, shape: Vec<usize> },
}

/// Malformed or unsupported `.npy` container.
#[derive(Debug, Error)]
pub enum NpyError {
    #[error("not an npy file (bad magic string)")]
    BadMagic,

    #[error("unsupported npy format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("malformed npy header: {0}")]
    Header(String),

    #[error("unsupported dtype {0:?}, only float64 is supported")]
    UnsupportedDtype(String),

    #[error("unsupported array rank {0}, at most 2 dimensions are supported")]
    UnsupportedRank(usize),

    #[error("npy data is truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("npy file has {0} unexpected trailing bytes")]
    TrailingData(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Npy(#[from] NpyError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
