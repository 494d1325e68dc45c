// src/compact.rs

use serde_json::Value;

/// Recursively drops nulls, then any object or array left empty.
///
/// Returns `None` when nothing survives. `false`, `0` and empty strings are
/// real values and are kept.
pub fn compact(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let map: serde_json::Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| compact(value).map(|v| (key, v)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(compact).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        other => Some(other),
    }
}

/// Like [`compact`], but an all-empty tree becomes `{}` instead of vanishing.
pub fn compact_object(value: Value) -> Value {
    compact(value).unwrap_or_else(|| Value::Object(Default::default()))
}
