//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding, decoding, or input validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The line is not valid JSON (or not valid UTF-8).
    #[error("invalid JSON: {message}")]
    InvalidJson {
        /// Parser error message, including position.
        message: String,
    },

    /// The line is valid JSON but not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// Description of the value that was found.
        found: &'static str,
    },

    /// Caller-supplied input has the wrong shape.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong.
        message: String,
    },

    /// Failed to encode a value to JSON.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode a record into a typed value.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid JSON error.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Returns true if this error describes an undecodable line.
    #[must_use]
    pub fn is_malformed_line(&self) -> bool {
        matches!(self, Self::InvalidJson { .. } | Self::NotAnObject { .. })
    }
}
