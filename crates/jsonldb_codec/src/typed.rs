//! Conversion between records and serde types.

use crate::error::{CodecError, CodecResult};
use crate::record::{value_kind, Record};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serializes `value` into a record.
///
/// # Errors
///
/// - [`CodecError::EncodingFailed`] if serialization fails
/// - [`CodecError::NotAnObject`] if `value` does not serialize to an object
pub fn to_record<T: Serialize + ?Sized>(value: &T) -> CodecResult<Record> {
    match serde_json::to_value(value).map_err(|e| CodecError::encoding_failed(e.to_string()))? {
        Value::Object(record) => Ok(record),
        other => Err(CodecError::NotAnObject {
            found: value_kind(&other),
        }),
    }
}

/// Deserializes a record into `T`.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the record does not match `T`.
pub fn from_record<T: DeserializeOwned>(record: Record) -> CodecResult<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| CodecError::decoding_failed(e.to_string()))
}
