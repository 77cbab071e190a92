//! # JSONLDB Codec
//!
//! JSON line encoding/decoding for JSONLDB.
//!
//! This crate defines what a stored record is and how it maps to one line
//! of a JSON Lines file:
//!
//! - A [`Record`] is a JSON object; arrays and scalars are not records
//! - Each record encodes to exactly one line with no raw line breaks
//! - A line that is not valid JSON, or not an object, is malformed
//!
//! It also validates caller input before writes and provides the strict
//! equality used by attribute lookups.
//!
//! ## Usage
//!
//! ```
//! use jsonldb_codec::{decode_line, encode_record, records_from_value};
//! use serde_json::json;
//!
//! let records = records_from_value(json!({"name": "Alice", "age": 25})).unwrap();
//! let line = encode_record(&records[0]).unwrap();
//!
//! let decoded = decode_line(line.as_bytes()).unwrap();
//! assert_eq!(decoded, records[0]);
//!
//! assert!(decode_line(b"not-json").is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod compare;
mod error;
mod input;
mod record;
mod typed;

pub use compare::{field_equals, strict_equals};
pub use error::{CodecError, CodecResult};
pub use input::{records_from_value, records_from_values};
pub use record::{decode_line, encode_record, value_kind, Record};
pub use serde_json::Value;
pub use typed::{from_record, to_record};
