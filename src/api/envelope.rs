//! Response envelope handling.
//!
//! Some backend handlers wrap their payload as `{"data": ...}` and some
//! return it bare. Every JSON endpoint goes through [`unwrap_data`] so
//! callers see the payload either way.

use serde_json::Value;

/// Return the `data` member of an enveloped body, or the body unchanged.
///
/// A falsy `data` member (`null`, `false`, `0` or `""`) counts as absent.
/// Empty arrays and objects are still unwrapped.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(is_present) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
