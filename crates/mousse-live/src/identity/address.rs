//! Compositional component addresses.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

/// Suffix appended to a content address to form its wrapper address.
pub const WRAPPER_SUFFIX: &str = "-root";

/// Durable identity of one live component instance.
///
/// An address is `parent + "-" + id` when the component sits under a parent,
/// and plain `id` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps an already computed address.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Computes the address of `id` under an optional parent.
    ///
    /// An empty parent is treated as absent.
    #[must_use]
    pub fn resolve(parent: Option<&str>, id: &str) -> Self {
        match parent.filter(|parent| !parent.is_empty()) {
            Some(parent) => Self(format!("{parent}-{id}")),
            None => Self(id.to_owned()),
        }
    }

    /// Secondary wrapper address owned by some component types.
    #[must_use]
    pub fn wrapper(&self) -> Self {
        Self(format!("{}{WRAPPER_SUFFIX}", self.0))
    }

    /// Borrowed textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
