//! Request parameter hygiene
//!
//! Array and object valued parameters open the door to query injection
//! against document stores (`name[$ne]=x`), so they are stripped before a
//! request intent is built unless the security policy says otherwise.

use serde_json::Value;
use std::collections::HashMap;

/// Whether `value` is an array or an object
pub fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Copy `params`, dropping composite values when `remove_composite` is set
pub fn sanitize(params: &HashMap<String, Value>, remove_composite: bool) -> HashMap<String, Value> {
    params
        .iter()
        .filter(|(_, value)| !(remove_composite && is_composite(value)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
