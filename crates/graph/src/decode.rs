//! Response decoding helpers.
//!
//! Graph responses are loosely typed: IDs arrive as numbers or numeric
//! strings and success flags as bools, numbers or strings.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GraphError;

/// Envelope for list responses: `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Decodes a JSON value into `T`; failures become [`GraphError::Decoding`].
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GraphError> {
    serde_json::from_value(value).map_err(|e| GraphError::Decoding(e.to_string()))
}

/// Decodes the `data` member of a list response.
pub fn decode_data<T: DeserializeOwned>(value: Value) -> Result<T, GraphError> {
    decode::<DataResponse<T>>(value).map(|r| r.data)
}

/// Integer from a number or a numeric string.
pub fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative integer from a number or a numeric string.
pub fn u64_value(value: &Value) -> Option<u64> {
    int_value(value).and_then(|i| u64::try_from(i).ok())
}

/// Boolean from a bool, a number (non-zero is true) or a string.
pub fn bool_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" | "" => Some(false),
            other => other.parse::<f64>().ok().map(|f| f != 0.0),
        },
        _ => None,
    }
}

/// String from a string or a number (IDs are sometimes numeric).
pub fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
