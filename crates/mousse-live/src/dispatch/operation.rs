//! Wire representation of one update-stream entry.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::component::Payload;
use crate::identity::Address;

use super::errors::DispatchError;

/// One entry of an inbound frame.
///
/// `func` is an opaque key into the [`super::HandlerRegistry`]; every field
/// besides `func`, `id`, and `parentID` lands in [`Operation::payload`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    /// Registration key naming the route.
    pub func: String,
    /// Local identifier of the target component.
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub id: Option<String>,
    /// Address of the parent component.
    #[serde(default, rename = "parentID", deserialize_with = "lenient_identifier")]
    pub parent_id: Option<String>,
    /// Verb-specific fields.
    #[serde(flatten)]
    pub payload: Payload,
}

impl Operation {
    /// Builds an operation from one element of a decoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnresolvedHandler`] when `func` is missing or
    /// not a string, and [`DispatchError::InvalidOperation`] when the element
    /// is not an object or its routing fields have the wrong type.
    pub fn from_value(value: Value) -> Result<Self, DispatchError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(DispatchError::invalid(
                    "",
                    format!("expected an operation object, got {other}"),
                ));
            }
        };
        let func = match fields.get("func") {
            Some(Value::String(func)) => func.clone(),
            Some(other) => return Err(DispatchError::unresolved(other.to_string())),
            None => return Err(DispatchError::unresolved("")),
        };
        serde_json::from_value(Value::Object(fields))
            .map_err(|error| DispatchError::invalid(func, error.to_string()))
    }

    /// Parent address, with an empty `parentID` treated as absent.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .filter(|parent| !parent.is_empty())
    }

    /// Address computed from `parentID` and `id`, when an `id` is present.
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        self.id
            .as_deref()
            .map(|id| Address::resolve(self.parent(), id))
    }
}

fn lenient_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "identifier must be a string or number, got {other}"
        ))),
    }
}
