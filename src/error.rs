//! Error types for hashpipe
//!
//! The adapters in [`crate::pipe`] never produce these: they hand back the
//! wrapped stream's `std::io::Error` untouched. This enum is used by the
//! copy helpers, configuration and the CLI built on top of them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hashpipe operations
#[derive(Error, Debug)]
pub enum HashPipeError {
    /// I/O error while copying or hashing
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        /// File the error happened on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a stream with no path (stdin, stdout, in-memory)
    #[error("I/O error: {0}")]
    Stream(#[source] std::io::Error),

    /// Digest did not match the expected value
    #[error("Integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch {
        /// Digest the payload should have hashed to
        expected: String,
        /// Digest actually computed
        actual: String,
    },

    /// Hash algorithm not supported
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        /// What was being done
        context: String,
        /// Wrapped error
        #[source]
        source: Box<HashPipeError>,
    },
}

impl HashPipeError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an integrity mismatch error
    pub fn integrity_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::IntegrityMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error is an integrity failure, looking through context
    pub fn is_integrity_error(&self) -> bool {
        match self {
            Self::IntegrityMismatch { .. } => true,
            Self::WithContext { source, .. } => source.is_integrity_error(),
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::WithContext { source, .. } => source.path(),
            _ => None,
        }
    }
}

/// Result type alias for hashpipe operations
pub type Result<T> = std::result::Result<T, HashPipeError>;

impl From<std::io::Error> for HashPipeError {
    fn from(err: std::io::Error) -> Self {
        HashPipeError::Stream(err)
    }
}

impl From<serde_json::Error> for HashPipeError {
    fn from(err: serde_json::Error) -> Self {
        HashPipeError::ConfigError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| HashPipeError::io(path, e))
    }
}
