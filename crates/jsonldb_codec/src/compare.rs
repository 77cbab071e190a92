//! Strict equality for attribute lookups.
//!
//! Attribute matching follows identity-style equality on decoded JSON:
//!
//! - `null`, booleans and strings compare by value
//! - numbers compare numerically, so `1` equals `1.0`
//! - arrays and objects never compare equal; a freshly decoded container
//!   can never be the same instance as a caller-supplied one
//!
//! Use a predicate with `==` when deep comparison of containers is wanted.

use crate::record::Record;
use serde_json::{Number, Value};

/// Returns true if `a` and `b` are strictly equal.
#[must_use]
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => false,
    }
}

/// Returns true if `record` has `attribute` and it strictly equals `value`.
///
/// A missing attribute never matches, not even `null`.
#[must_use]
pub fn field_equals(record: &Record, attribute: &str, value: &Value) -> bool {
    record
        .get(attribute)
        .is_some_and(|field| strict_equals(field, value))
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    // Exact integer comparison first so large integers are not rounded.
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_compare_by_value() {
        assert!(strict_equals(&json!(null), &json!(null)));
        assert!(strict_equals(&json!(true), &json!(true)));
        assert!(!strict_equals(&json!(true), &json!(false)));
        assert!(strict_equals(&json!("Bob"), &json!("Bob")));
        assert!(!strict_equals(&json!("Bob"), &json!("bob")));
    }

    #[test]
    fn numbers_compare_numerically() {
        assert!(strict_equals(&json!(30), &json!(30)));
        assert!(strict_equals(&json!(30), &json!(30.0)));
        assert!(strict_equals(&json!(-2), &json!(-2.0)));
        assert!(!strict_equals(&json!(30), &json!(31)));
        assert!(strict_equals(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!strict_equals(&json!(u64::MAX), &json!(u64::MAX - 1)));
    }

    #[test]
    fn types_do_not_coerce() {
        assert!(!strict_equals(&json!(1), &json!("1")));
        assert!(!strict_equals(&json!(0), &json!(false)));
        assert!(!strict_equals(&json!(null), &json!(false)));
    }

    #[test]
    fn containers_never_match() {
        assert!(!strict_equals(&json!([1]), &json!([1])));
        assert!(!strict_equals(&json!({"a": 1}), &json!({"a": 1})));
    }

    #[test]
    fn field_lookup() {
        let Value::Object(record) = json!({"name": "Bob", "age": 30, "gone": null}) else {
            unreachable!()
        };

        assert!(field_equals(&record, "name", &json!("Bob")));
        assert!(field_equals(&record, "age", &json!(30)));
        assert!(field_equals(&record, "gone", &json!(null)));
        assert!(!field_equals(&record, "missing", &json!(null)));
        assert!(!field_equals(&record, "name", &json!("Alice")));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn integers_equal_their_exact_float(i in -(1i64 << 53)..(1i64 << 53)) {
                prop_assert!(strict_equals(&json!(i), &json!(i as f64)));
                prop_assert!(strict_equals(&json!(i as f64), &json!(i)));
            }

            #[test]
            fn equality_is_symmetric(a in any::<i64>(), b in any::<u64>(), s in "[a-z]{0,4}") {
                let values = [json!(a), json!(b), json!(s), json!(null), json!(a % 2 == 0)];
                for x in &values {
                    for y in &values {
                        prop_assert_eq!(strict_equals(x, y), strict_equals(y, x));
                    }
                }
            }

            #[test]
            fn containers_never_match(items in prop::collection::vec(any::<i32>(), 0..4)) {
                let array = json!(items);
                prop_assert!(!strict_equals(&array, &array.clone()));
            }
        }
    }
}
