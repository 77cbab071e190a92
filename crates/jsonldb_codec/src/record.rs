//! Record type and single-line encoding.

use crate::error::{CodecError, CodecResult};
use serde_json::Value;

/// A stored record: one JSON object.
///
/// Records have no schema and no system-assigned identity; a record's
/// position in the file is its only identity.
pub type Record = serde_json::Map<String, Value>;

/// Returns a short description of a value's JSON type, for messages.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes one line into a record.
///
/// Surrounding whitespace is ignored. The line must be valid UTF-8 and
/// hold exactly one JSON object.
///
/// # Errors
///
/// - [`CodecError::InvalidJson`] if the bytes are not valid JSON
/// - [`CodecError::NotAnObject`] if the JSON value is not an object
pub fn decode_line(line: &[u8]) -> CodecResult<Record> {
    let value: Value =
        serde_json::from_slice(line).map_err(|e| CodecError::invalid_json(e.to_string()))?;

    match value {
        Value::Object(record) => Ok(record),
        other => Err(CodecError::NotAnObject {
            found: value_kind(&other),
        }),
    }
}

/// Encodes a record as a single line, without a line terminator.
///
/// JSON string escaping guarantees the output never contains a raw
/// newline or carriage return.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_record(record: &Record) -> CodecResult<String> {
    serde_json::to_string(record).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_object() {
        let record = decode_line(br#"{"name":"Alice","age":25}"#).unwrap();
        assert_eq!(record["name"], json!("Alice"));
        assert_eq!(record["age"], json!(25));
    }

    #[test]
    fn decode_ignores_surrounding_whitespace() {
        let record = decode_line(b"  {\"a\":1}\t ").unwrap();
        assert_eq!(record["a"], json!(1));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_line(b"not-json").unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson { .. }));
        assert!(err.is_malformed_line());
    }

    #[test]
    fn decode_rejects_truncated_object() {
        let err = decode_line(br#"{"a":1"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson { .. }));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let err = decode_line(&[b'"', 0xff, b'"']).unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson { .. }));
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert_eq!(
            decode_line(b"[1,2]").unwrap_err(),
            CodecError::NotAnObject { found: "an array" }
        );
        assert_eq!(
            decode_line(b"42").unwrap_err(),
            CodecError::NotAnObject { found: "a number" }
        );
        assert_eq!(
            decode_line(b"null").unwrap_err(),
            CodecError::NotAnObject { found: "null" }
        );
    }

    #[test]
    fn encode_escapes_line_breaks() {
        let mut record = Record::new();
        record.insert("text".into(), json!("line one\nline two\r"));

        let line = encode_record(&record).unwrap();
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
        assert_eq!(decode_line(line.as_bytes()).unwrap(), record);
    }

    #[test]
    fn encode_nested_values() {
        let Value::Object(record) = json!({"tags": ["a", "b"], "meta": {"n": 1.5}}) else {
            unreachable!()
        };
        let line = encode_record(&record).unwrap();
        assert_eq!(decode_line(line.as_bytes()).unwrap(), record);
    }

    #[test]
    fn kinds() {
        assert_eq!(value_kind(&json!(true)), "a boolean");
        assert_eq!(value_kind(&json!("s")), "a string");
        assert_eq!(value_kind(&json!({})), "an object");
    }
}
