//! Validation of caller-supplied values before they are written.
//!
//! Every element is checked before anything is returned, so a rejected
//! batch never results in a partial write.

use crate::error::{CodecError, CodecResult};
use crate::record::{value_kind, Record};
use serde_json::Value;

/// Converts an object, or an array of objects, into records.
///
/// An empty array yields no records.
///
/// # Errors
///
/// Returns [`CodecError::InvalidInput`] if `value` is neither an object
/// nor an array, or if any array element is not an object.
pub fn records_from_value(value: Value) -> CodecResult<Vec<Record>> {
    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => records_from_values(items),
        other => Err(CodecError::invalid_input(format!(
            "expected an object or an array of objects, found {}",
            value_kind(&other)
        ))),
    }
}

/// Converts a sequence of values into records, rejecting the whole
/// sequence if any element is not an object.
///
/// # Errors
///
/// Returns [`CodecError::InvalidInput`] naming the first offending index.
pub fn records_from_values<I>(values: I) -> CodecResult<Vec<Record>>
where
    I: IntoIterator<Item = Value>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(record) => Ok(record),
            other => Err(CodecError::invalid_input(format!(
                "element {index} is {}, expected an object",
                value_kind(&other)
            ))),
        })
        .collect()
}
