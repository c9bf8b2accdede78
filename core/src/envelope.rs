//! The parsed JSON body returned by the server.
//!
//! # Design
//! The envelope is not a fixed schema. It is kept as the raw `Value` so that
//! unknown fields, key order and nesting survive untouched, and typed
//! accessors read the handful of fields the classifier cares about.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(Value);

impl Envelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The application status code. Absent or non-integral values read as
    /// `None`.
    pub fn code(&self) -> Option<i64> {
        self.0.get("code").and_then(as_integer)
    }

    /// The HTTP-style status the server embedded in the body, if any.
    pub fn status_code(&self) -> Option<i64> {
        self.0.get("status_code").and_then(as_integer)
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// `message` as error text. Numbers and booleans are rendered as text;
    /// null, arrays and objects give `None`.
    pub fn error_message(&self) -> Option<String> {
        match self.0.get("message")? {
            Value::String(s) => Some(s.clone()),
            v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Deserialize a single payload field.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T, serde_json::Error>> {
        self.0.get(key).cloned().map(serde_json::from_value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Envelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Whole numbers are accepted whether JSON encoded them as `7` or `7.0`.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}
