//! Error types for the divergence pipeline.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, DivergenceError>;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum DivergenceError {
    /// Rolling window length of zero (the window must contain at least one bar)
    #[error("invalid rolling window length: {0} (must be at least 1)")]
    InvalidPeriod(usize),

    /// A source could not be opened or read
    #[error("source '{name}': {message}")]
    Source { name: String, message: String },

    /// CSV encoding/decoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure (run summary export)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Generic(String),
}

impl DivergenceError {
    /// Create a generic error from any string-like type.
    pub fn generic(msg: impl Into<String>) -> Self {
        DivergenceError::Generic(msg.into())
    }

    /// Create a source error with the offending source's name attached.
    pub fn source(source: impl Into<String>, message: impl Into<String>) -> Self {
        DivergenceError::Source {
            name: source.into(),
            message: message.into(),
        }
    }
}

impl From<String> for DivergenceError {
    fn from(err: String) -> Self {
        DivergenceError::Generic(err)
    }
}

impl From<&str> for DivergenceError {
    fn from(err: &str) -> Self {
        DivergenceError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DivergenceError::InvalidPeriod(0);
        assert_eq!(
            err.to_string(),
            "invalid rolling window length: 0 (must be at least 1)"
        );
    }

    #[test]
    fn test_source_error_display() {
        let err = DivergenceError::source("corn", "file not found");
        assert_eq!(err.to_string(), "source 'corn': file not found");
    }

    #[test]
    fn test_result_type() {
        let result: Result<i32> = Err(DivergenceError::generic("boom"));
        assert!(result.is_err());
    }
}
