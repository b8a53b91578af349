use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The free-form configuration object of a node.
///
/// The builder UI stores whatever the node form produced, so values arrive as
/// strings, numbers or booleans interchangeably. The accessors here read them the
/// way the form meant them: empty strings, `0`, `false` and `null` count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeConfig(Map<String, Value>);

impl NodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this config with `key` set to `value`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when `key` holds a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    /// Reads `key` as non-empty text. Numbers and booleans are stringified.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(value_as_text)
    }

    /// Reads `key` as a number. Numeric strings are parsed; `NaN` counts as unset.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(value_as_number)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.is_set(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for NodeConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn value_as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| !n.is_nan())
}
