//! Error types for trend analysis

use thiserror::Error;

/// Result type alias for trend analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for trend analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the operation
    #[error("Insufficient data: expected at least {expected} points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation failed
    #[error("Computation error: {0}")]
    Computation(String),

    /// Execution or parallelism error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an error for empty input
    pub fn empty_input(context: &str) -> Self {
        Error::InvalidInput(format!("Empty input provided to {context}"))
    }

    /// Create an error for mismatched input sizes
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Error::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for non-finite values in input
    pub fn non_finite(context: &str) -> Self {
        Error::InvalidInput(format!("Non-finite values in {context}"))
    }
}
