//! Error types for GridFin.
//!
//! This module defines a unified error enum covering every failure category
//! in the query and ingestion pipelines: configuration, embedding generation,
//! vector-index access, dimension disagreements, and answer generation.

use thiserror::Error;

/// Unified error type for GridFin.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
///
/// A metric-definition lookup miss is deliberately *not* an error: the
/// metric store returns `Ok(None)` and the caller renders a user-facing
/// apology instead of failing the request.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A malformed inbound request (e.g. empty query text).
    /// Maps to HTTP 400 at the server boundary.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding provider call failed or returned a malformed response
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index unreachable or returned a malformed response
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Embedding dimension disagrees with the index's configured dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Language-model completion call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = AppError::DimensionMismatch {
            expected: 1536,
            actual: 384,
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 1536, got 384"
        );
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
