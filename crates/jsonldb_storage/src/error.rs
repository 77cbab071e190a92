//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not exist.
    ///
    /// Only raised by operations that require the file to be present;
    /// read paths treat a missing file as empty instead.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Renaming a scratch file over its target failed.
    ///
    /// The target is left as it was before the rename was attempted.
    #[error("failed to replace {}: {source}", target.display())]
    Persist {
        /// The file that was to be replaced.
        target: PathBuf,
        /// The underlying rename error.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Creates a not-found error for `path`.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Returns true if this error means the file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            Self::Persist { .. } => false,
        }
    }
}
