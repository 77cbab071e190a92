//! Property-based test generators using proptest.
//!
//! Generated values always encode to a single JSON line and decode back to
//! an equal value, so they can be used to state storage invariants.

use jsonldb_codec::Record;
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating valid collection names.
///
/// The lock file name is reserved and never generated.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_.-]{0,31}")
        .expect("Invalid regex")
        .prop_filter("reserved name", |name| !name.eq_ignore_ascii_case("LOCK"))
}

/// Strategy for generating record keys.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").expect("Invalid regex")
}

/// Strategy for generating JSON scalars.
///
/// Strings may contain newlines and quotes to exercise escaping. Floats
/// are left out because not every `f64` survives a JSON round trip.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        "[a-zA-Z0-9 \n\r\t\"\\\\é]{0,16}".prop_map(Value::String),
    ]
}

/// Strategy for generating JSON values nested up to a few levels.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key_strategy(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for generating records.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..6)
        .prop_map(|m| m.into_iter().collect::<Map<String, Value>>())
}

/// Strategy for generating records with an integer `id` and a small
/// integer `group`, for predicate-based tests.
pub fn keyed_record_strategy() -> impl Strategy<Value = Record> {
    (any::<u32>(), 0u8..4, record_strategy()).prop_map(|(id, group, mut record)| {
        record.insert("id".to_string(), Value::from(id));
        record.insert("group".to_string(), Value::from(group));
        record
    })
}

/// Strategy for generating a list of records.
pub fn records_strategy(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 0..=max_len)
}

/// Strategy for generating a list of keyed records.
pub fn keyed_records_strategy(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(keyed_record_strategy(), 0..=max_len)
}

/// Strategy for generating lines that are never valid records.
pub fn malformed_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("not-json".to_string()),
        Just("[1,2,3]".to_string()),
        Just("42".to_string()),
        Just("\"text\"".to_string()),
        Just("{\"open\":".to_string()),
        "[a-z]{1,12}".prop_map(|s| format!("{{{s}")),
    ]
}

/// One line of generated file content.
#[derive(Debug, Clone)]
pub enum Line {
    /// A valid record.
    Record(Record),
    /// A line that does not decode.
    Malformed(String),
}

/// Strategy for generating mixed file content.
pub fn mixed_lines_strategy(max_len: usize) -> impl Strategy<Value = Vec<Line>> {
    prop::collection::vec(
        prop_oneof![
            3 => record_strategy().prop_map(Line::Record),
            1 => malformed_line_strategy().prop_map(Line::Malformed),
        ],
        0..=max_len,
    )
}
