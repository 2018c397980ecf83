// Argument parsing and normalization
//
// Parsing is strict: malformed JSON is rejected outright, never repaired.
// Normalization coerces whatever shape survived parsing into the argument
// map the backends expect.

use serde_json::Value;

use crate::tools::types::JsonMap;

/// Strict JSON parse of the raw argument string from the model.
pub fn parse_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Normalize a parsed value into an argument map.
///
/// Objects pass through. Strings get one extra decode pass to tolerate
/// double- or triple-encoded arguments before being wrapped as `content`.
/// A list of objects contributes its first element; any other list or
/// scalar is wrapped under `value`.
pub fn normalize_arguments(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        Value::String(s) => {
            if let Ok(inner) = serde_json::from_str::<Value>(&s) {
                return normalize_arguments(inner);
            }
            let mut map = JsonMap::new();
            map.insert("content".to_string(), Value::String(s));
            map
        }
        Value::Array(items) => {
            if let Some(Value::Object(first)) = items.first() {
                return first.clone();
            }
            let mut map = JsonMap::new();
            map.insert("value".to_string(), Value::Array(items));
            map
        }
        scalar => {
            let mut map = JsonMap::new();
            map.insert("value".to_string(), scalar);
            map
        }
    }
}
