//! Error types for hierarchy construction and render configuration.

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure while building an acceleration hierarchy.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("out of memory while growing the hierarchy: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("invalid accelerator parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for hierarchy construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Render configuration rejected at the configuration boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
}
