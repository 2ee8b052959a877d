//! Pure functions for converting JSON values to and from cache strings.
//!
//! Strings are stored raw so they stay readable from `redis-cli`; every other
//! value is stored as its JSON encoding. Decoding tries JSON first and falls
//! back to the raw string, which means a stored string that happens to look
//! like JSON (for example `"42"`) comes back as the parsed value.

use serde_json::Value;

use super::{CacheError, Result};

/// Encodes a value for storage.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sutra_core::cache::encode_value;
///
/// assert_eq!(encode_value(&json!("EMP-1")).unwrap(), "EMP-1");
/// assert_eq!(encode_value(&json!({"total": 3})).unwrap(), r#"{"total":3}"#);
/// ```
pub fn encode_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => serde_json::to_string(other).map_err(|e| CacheError::Serialization(e.to_string())),
    }
}

/// Decodes a stored string back into a value.
///
/// Never fails: text that is not valid JSON is returned as [`Value::String`].
pub fn decode_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
