//! Error types for JSONLDB core.

use jsonldb_codec::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in JSONLDB core operations.
///
/// Malformed lines are deliberately absent: they are logged and skipped,
/// never surfaced as errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] jsonldb_storage::StorageError),

    /// JSON codec error.
    #[error("codec error: {0}")]
    Codec(#[source] CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Caller-supplied input has the wrong shape. Nothing was written.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong.
        message: String,
    },

    /// The file holds no decodable record.
    #[error("no records in {}", path.display())]
    EmptyFile {
        /// The file that was read.
        path: PathBuf,
    },

    /// Batch size must be at least 1.
    #[error("invalid batch size: {size}")]
    InvalidBatchSize {
        /// The rejected size.
        size: usize,
    },

    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Collection name cannot be mapped to a file.
    #[error("invalid collection name {name:?}: {reason}")]
    InvalidCollectionName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Another handle holds the directory lock.
    #[error("directory locked: {}", path.display())]
    DirectoryLocked {
        /// The locked directory.
        path: PathBuf,
    },

    /// The on-disk layout is not what was expected.
    #[error("invalid format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// A caller-supplied predicate or transform failed.
    #[error("callback failed: {source}")]
    Callback {
        /// The error returned by the callback.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CoreError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an empty file error.
    pub fn empty_file(path: impl Into<PathBuf>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an invalid collection name error.
    pub fn invalid_collection_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidCollectionName {
            name: name.into(),
            reason,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Wraps an error raised inside a user callback.
    pub fn callback(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Callback {
            source: source.into(),
        }
    }
}

impl From<CodecError> for CoreError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidInput { message } => Self::InvalidInput { message },
            other => Self::Codec(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_input_errors_become_invalid_input() {
        let err: CoreError = CodecError::invalid_input("element 0 is a number").into();
        assert!(matches!(
            err,
            CoreError::InvalidInput { ref message } if message == "element 0 is a number"
        ));
    }

    #[test]
    fn other_codec_errors_are_wrapped() {
        let err: CoreError = CodecError::encoding_failed("boom").into();
        assert!(matches!(err, CoreError::Codec(CodecError::EncodingFailed { .. })));
    }

    #[test]
    fn callback_from_str() {
        let err = CoreError::callback("transform rejected record");
        assert_eq!(err.to_string(), "callback failed: transform rejected record");
    }

    #[test]
    fn display_paths() {
        let err = CoreError::empty_file("/tmp/x.jsonl");
        assert_eq!(err.to_string(), "no records in /tmp/x.jsonl");
    }
}
