//! Typed access to per-item operation parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::blockchain::types::{ConnectorError, ConnectorResult};

/// Default page size for list operations.
pub const DEFAULT_LIMIT: u64 = 50;

/// Parameter bag of one processed item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Required non-empty string. Numbers are accepted and rendered in decimal.
    pub fn str(&self, name: &str) -> ConnectorResult<String> {
        match self.0.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::String(_)) | Some(Value::Null) | None => Err(ConnectorError::validation(
                format!("missing required parameter '{}'", name),
            )),
            Some(other) => Err(ConnectorError::validation(format!(
                "parameter '{}' must be a string, got {}",
                name, other
            ))),
        }
    }

    /// String with a fallback for absent or empty values.
    pub fn str_or(&self, name: &str, default: &str) -> ConnectorResult<String> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(default.to_string()),
            Some(Value::String(s)) if s.is_empty() => Ok(default.to_string()),
            Some(_) => self.str(name),
        }
    }

    /// Page size from `limit`; accepts a number or a numeric string.
    pub fn limit(&self) -> ConnectorResult<u64> {
        let invalid = |v: &Value| {
            ConnectorError::validation(format!(
                "parameter 'limit' must be a positive integer, got {}",
                v
            ))
        };
        match self.0.get("limit") {
            None | Some(Value::Null) => Ok(DEFAULT_LIMIT),
            Some(v @ Value::Number(n)) => n.as_u64().filter(|l| *l > 0).ok_or_else(|| invalid(v)),
            Some(v @ Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|l| *l > 0)
                .ok_or_else(|| invalid(v)),
            Some(v) => Err(invalid(v)),
        }
    }

    /// JSON parameter: a string is parsed, any other value is taken as-is.
    pub fn json(&self, name: &str) -> ConnectorResult<Value> {
        match self.0.get(name) {
            Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|e| {
                ConnectorError::validation(format!("malformed JSON in '{}': {}", name, e))
            }),
            Some(Value::Null) | None => Err(ConnectorError::validation(format!(
                "missing required parameter '{}'",
                name
            ))),
            Some(value) => Ok(value.clone()),
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = ConnectorError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConnectorError::validation(format!(
                "item parameters must be a JSON object, got {}",
                other
            ))),
        }
    }
}
