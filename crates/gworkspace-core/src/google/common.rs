//! Shared utilities for Google API modules

use serde_json::Value;

/// Extract an array field from a JSON response, returning an empty vec if missing.
///
/// Google APIs return lists under varying field names ("items", "messages",
/// "labels", "files", "results").
pub fn extract_array(response: &Value, field: &str) -> Vec<Value> {
    response
        .get(field)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Percent-encode an identifier used as a URL path segment.
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
