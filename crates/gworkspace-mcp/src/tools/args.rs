//! Tool argument extraction
//!
//! Missing or mistyped required arguments surface as invalid-params errors.

use gworkspace_core::{AppError, AppResult};
use serde_json::{json, Value};

/// Extract a required, non-empty string argument
pub fn require_string<'a>(args: &'a Value, key: &str) -> AppResult<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::invalid_params(format!("Missing required parameter: {}", key)))
}

/// Extract an optional string argument; empty strings count as absent
pub fn optional_string<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

/// Extract a string argument with a default value
pub fn string_with_default<'a>(args: &'a Value, key: &str, default: &'a str) -> &'a str {
    optional_string(args, key).unwrap_or(default)
}

/// Extract a positive count, clamped to `max`
pub fn count_with_default(args: &Value, key: &str, default: u32, max: u32) -> u32 {
    args.get(key)
        .and_then(|v| v.as_u64())
        .filter(|n| *n > 0)
        .map(|n| n.min(max as u64) as u32)
        .unwrap_or(default)
}

/// Extract a bool argument with a default value
pub fn bool_with_default(args: &Value, key: &str, default: bool) -> bool {
    args.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Extract a list of strings given either as an array or a comma-separated string
pub fn string_list(args: &Value, key: &str) -> Vec<String> {
    match args.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Input schema for a tool. `user_google_email` is added to every tool.
pub fn schema(properties: Value, required: &[&str]) -> Value {
    let mut props = json!({
        "user_google_email": {
            "type": "string",
            "description": "The user's Google email address."
        }
    });
    if let (Some(all), Value::Object(extra)) = (props.as_object_mut(), properties) {
        all.extend(extra);
    }

    let mut required_all = vec!["user_google_email"];
    required_all.extend_from_slice(required);

    json!({
        "type": "object",
        "properties": props,
        "required": required_all,
    })
}
