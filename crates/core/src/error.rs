//! Error types for multispec

use thiserror::Error;

/// Main error type for multispec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid band dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in band of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Band shape mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    ShapeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Pixel stack must contain at least one band")]
    EmptyStack,

    #[error("Cluster count must be at least 1, got {given}")]
    InvalidClusterCount { given: usize },

    #[error("Band {band} has no valid pixels to determine initial class means")]
    InsufficientData { band: usize },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for multispec operations
pub type Result<T> = std::result::Result<T, Error>;
