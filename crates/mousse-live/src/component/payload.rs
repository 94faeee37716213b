//! Loosely typed operation payload with the coercions handlers rely on.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Color, Width};

/// Verb-specific fields of an operation.
///
/// Servers send whatever JSON they like, so accessors coerce values the way
/// the browser client historically did: numbers and booleans stringify, and
/// `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Builds a payload from a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw field, with `null` treated as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Field only when it is a JSON string.
    #[must_use]
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Field stringified; `None` when absent.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(stringify)
    }

    /// Truthiness of the field, or `default` when absent.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, truthy)
    }

    /// Numeric value of the field; `None` when absent or not a number.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        let number = match self.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        };
        number.filter(|value| !value.is_nan())
    }

    /// Recognised theme colour; `None` when absent or unknown.
    #[must_use]
    pub fn color(&self, key: &str) -> Option<Color> {
        self.text(key).and_then(|text| text.parse().ok())
    }

    /// Recognised width utility; `None` when absent or unknown.
    #[must_use]
    pub fn width(&self, key: &str) -> Option<Width> {
        self.text(key).and_then(|text| text.parse().ok())
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract().abs() < f64::EPSILON => {
                format!("{float:.0}")
            }
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
