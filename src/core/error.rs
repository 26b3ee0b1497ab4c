//! Error types for the editorial engine.

use crate::article::ArticleStatus;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for editorial operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in editorial operations.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Access errors
    #[error("Not authorized: {0}")]
    Authorization(String),

    // State machine errors
    #[error("Cannot {operation} an article in status {status}")]
    InvalidState {
        operation: &'static str,
        status: ArticleStatus,
    },

    #[error("Concurrent modification of article {0}, retry the operation")]
    Conflict(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // Lookup errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable, wire-visible classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    Authorization,
    InvalidState,
    Conflict,
    Config,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Config => "CONFIG",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Authorization(_) => ErrorKind::Authorization,
            Error::InvalidState { .. } => ErrorKind::InvalidState,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Config(_) => ErrorKind::Config,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Internal(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    pub(crate) fn invalid_state(operation: &'static str, status: ArticleStatus) -> Self {
        Error::InvalidState { operation, status }
    }

    pub(crate) fn poisoned(what: &str) -> Self {
        Error::Internal(format!("{} lock poisoned", what))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
