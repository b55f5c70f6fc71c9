//! Error types for classflow
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for classflow operations
#[derive(Debug, Error)]
pub enum ClassflowError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (malformed options, bad taint config, unknown
    /// context policy, unresolved signatures). Surfaced at initialization;
    /// the analysis refuses to run.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A stored result was requested under the wrong type
    #[error("Result '{id}' exists but has a different type")]
    ResultType { id: String },

    /// No result stored under the given id
    #[error("No result stored under id '{0}'")]
    ResultMissing(String),
}

impl ClassflowError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ClassflowError::Config(msg.into())
    }

    /// Create an analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        ClassflowError::Analysis(msg.into())
    }
}

/// Result type alias for classflow operations
pub type Result<T> = std::result::Result<T, ClassflowError>;
