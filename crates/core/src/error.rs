//! Error types for paperqa.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, document extraction, the
//! generation backend, prompts, and serialization.

use thiserror::Error;

/// Unified error type for paperqa.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// The pipeline functions themselves (normalize, chunk, score, select,
/// assemble) are total; only configuration and the two external
/// collaborators produce errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (including invalid chunking parameters)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source document could not be opened or parsed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Source document yielded too little text to be useful
    #[error(
        "Not enough text extracted ({chars} characters, need at least {min}). \
         The document might be image-based or corrupted."
    )]
    InsufficientContent { chars: usize, min: usize },

    /// Generation backend unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Generation backend did not answer within the configured window
    #[error("Request timed out after {secs}s. Try a smaller document or a different model.")]
    Timeout { secs: u64 },

    /// Generation backend answered with a failure status or a malformed payload
    #[error("Backend error: {0}")]
    Backend(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether the error came from the generation backend.
    ///
    /// Interactive sessions use this to keep going after a failed turn.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            AppError::Connection(_) | AppError::Timeout { .. } | AppError::Backend(_)
        )
    }
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
