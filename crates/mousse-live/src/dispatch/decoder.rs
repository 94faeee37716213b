//! Turns one inbound frame into an ordered list of operations.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::operation::Operation;

/// One element of a decoded frame: an operation, or the reason the element
/// could not become one.
pub type Entry = Result<Operation, DispatchError>;

/// One message received on the update channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text message.
    Text(String),
    /// Binary message.
    Binary(Vec<u8>),
}

/// A frame that could not be decoded; the whole frame is dropped.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text was not a JSON array.
    #[error("malformed frame: {message}")]
    Malformed {
        /// Parser diagnostic.
        message: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    fn from_json_error(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source,
        }
    }
}

/// Decodes `frame`, preserving the order of the source array.
///
/// Whitespace-only text and binary frames yield no entries. An element that
/// does not form an operation becomes an error entry in its position; the
/// elements around it are unaffected.
///
/// # Errors
///
/// Returns [`DecodeError`] when the text is not a JSON array.
pub fn decode(frame: &Frame) -> Result<Vec<Entry>, DecodeError> {
    match frame {
        Frame::Text(text) if text.trim().is_empty() => Ok(Vec::new()),
        Frame::Text(text) => {
            let elements = serde_json::from_str::<Vec<Value>>(text).map_err(|error| {
                warn!(
                    target: DISPATCH_TARGET,
                    error = %error,
                    length = text.len(),
                    "dropping malformed frame"
                );
                DecodeError::from_json_error(error)
            })?;
            Ok(elements.into_iter().map(Operation::from_value).collect())
        }
        Frame::Binary(bytes) => {
            debug!(
                target: DISPATCH_TARGET,
                length = bytes.len(),
                "ignoring binary frame"
            );
            Ok(Vec::new())
        }
    }
}
