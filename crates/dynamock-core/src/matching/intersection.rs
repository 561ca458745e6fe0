//! Deep containment check for structured argument values.

use serde_json::Value;

/// Whether `expected` is contained in `actual`.
///
/// Objects match when every expected key is present with a contained value,
/// arrays when every expected element is contained in some actual element.
/// Everything else compares by equality. A `null` expectation is contained
/// in anything, an empty-object expectation in any non-null value.
pub fn contains(actual: &Value, expected: &Value) -> bool {
    match expected {
        Value::Null => true,
        Value::Object(fields) if fields.is_empty() => !actual.is_null(),
        _ => value_contains(actual, expected),
    }
}

fn value_contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => expected
            .iter()
            .all(|(k, ev)| actual.get(k).is_some_and(|av| value_contains(av, ev))),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|ev| actual.iter().any(|av| value_contains(av, ev))),
        _ => actual == expected,
    }
}
