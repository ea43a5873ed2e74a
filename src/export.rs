// Author: Dustin Pilgrim
// License: MIT

use serde_json::json;

use crate::{ChainError, Value};

/// Convert a runtime value to JSON.
///
/// Follows the usual stringify rules:
/// - Strings, numbers, booleans → direct mapping
/// - Arrays → JSON arrays; absent slots and functions become `null`
/// - Objects → JSON objects in field order; absent and function fields are dropped
/// - Non-finite numbers → `null`
///
/// Returns `None` for values with no JSON form at the top level (absent, functions).
pub fn value_to_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::Absent | Value::Function(_) => None,
        Value::Bool(b) => Some(json!(b)),
        Value::Number(n) => Some(serde_json::Number::from_f64(*n).map_or(serde_json::Value::Null, serde_json::Value::Number)),
        Value::String(s) => Some(json!(s)),
        Value::Array(items) => Some(serde_json::Value::Array(
            items
                .borrow()
                .iter()
                .map(|v| value_to_json(v).unwrap_or(serde_json::Value::Null))
                .collect(),
        )),
        Value::Object(map) => Some(serde_json::Value::Object(
            map.borrow()
                .iter()
                .filter_map(|(k, v)| value_to_json(v).map(|j| (k.clone(), j)))
                .collect(),
        )),
    }
}

/// Export a value as pretty-printed JSON text.
///
/// # Examples
/// ```
/// use safe_chain::{export_value_to_json, Value};
///
/// let user = Value::object([("name", Value::from("Ami")), ("age", Value::Absent)]);
/// let json = export_value_to_json(&user).unwrap();
/// assert!(json.contains("\"name\": \"Ami\""));
/// assert!(!json.contains("age"));
/// ```
///
/// # Errors
/// Returns a `TypeError` for values that have no JSON form (absent, functions).
pub fn export_value_to_json(value: &Value) -> Result<String, ChainError> {
    let json = value_to_json(value).ok_or_else(|| ChainError::TypeError {
        message: format!("Cannot export {} as JSON", value.type_name()),
        hint: Some("Only values reachable as data can be exported".into()),
        code: Some(407),
    })?;

    serde_json::to_string_pretty(&json).map_err(|e| ChainError::RuntimeError {
        message: format!("Failed to serialize value: {}", e),
        hint: None,
        code: Some(511),
    })
}
