//! Typed access to the loosely-typed argument object sent by the host

use crate::error::AppError;
use serde_json::{Map, Value};

/// Tool call arguments as received over MCP
#[derive(Debug, Clone, Default)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(AppError::InvalidInput(format!(
                "arguments must be a JSON object, got {}",
                kind(&other)
            ))),
        }
    }

    // JSON null counts as absent
    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// A string argument that must be present. Emptiness is checked by the
    /// caller so CLI and MCP input go through the same rule.
    pub fn required_string(&self, field: &str) -> Result<String, AppError> {
        self.optional_string(field)?
            .ok_or_else(|| AppError::missing(field))
    }

    /// A string argument; JSON numbers are accepted and rendered as text
    pub fn optional_string(&self, field: &str) -> Result<Option<String>, AppError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(AppError::InvalidInput(format!(
                "{} must be a string, got {}",
                field,
                kind(other)
            ))),
        }
    }

    /// A boolean argument; "true" and "false" strings are accepted
    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, AppError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(AppError::InvalidInput(format!(
                "{} must be a boolean, got {}",
                field,
                kind(other)
            ))),
        }
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
