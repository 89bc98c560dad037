//! Redaction of sensitive fields for audit logging.
//!
//! Matching is a case-insensitive substring test of each object key against
//! [`SENSITIVE_KEYS`]. This is a heuristic policy: a field whose name does not
//! contain one of the terms is logged as-is, so new sensitive field names have
//! to be added to the list explicitly.

use serde_json::{Map, Value};

/// Key fragments whose values are masked.
pub const SENSITIVE_KEYS: &[&str] = &[
    "token",
    "secret",
    "password",
    "telephone",
    "mobile",
    "email",
    "appToken",
    "appKey",
];

/// Replacement for masked content.
pub const MASK: &str = "***";

/// Check whether a key names a sensitive field.
pub fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    SENSITIVE_KEYS
        .iter()
        .any(|sensitive| key_lower.contains(&sensitive.to_lowercase()))
}

/// Mask a string, keeping its first and last character when it is long enough.
pub fn mask_string(value: &str) -> String {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if value.chars().count() > 3 => {
            format!("{first}{MASK}{last}")
        }
        _ => MASK.to_string(),
    }
}

/// Produce a copy of `value` with every sensitive field masked.
pub fn redact_sensitive(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive).collect()),
        Value::Object(map) => {
            let mut record = Map::with_capacity(map.len());
            for (key, val) in map {
                let redacted = if is_sensitive_key(key) {
                    mask_value(val)
                } else {
                    redact_sensitive(val)
                };
                record.insert(key.clone(), redacted);
            }
            Value::Object(record)
        }
        other => other.clone(),
    }
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(mask_string(s)),
        _ => Value::String(MASK.to_string()),
    }
}
