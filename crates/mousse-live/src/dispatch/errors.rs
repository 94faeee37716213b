//! Error types for operation dispatch failures.
//!
//! Every variant is contained at the granularity of one operation; none of
//! them aborts the rest of the frame or the session.

use thiserror::Error;

use crate::handlers::HandlerFault;
use crate::identity::{Address, IdentityError};

/// Errors surfaced while applying a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// `func` is not in the registration table.
    #[error("no handler registered for '{func}'")]
    UnresolvedHandler {
        /// Key that failed to resolve.
        func: String,
    },

    /// The operation targets an address that is not live.
    #[error("'{func}' targets '{address}', which is not live")]
    StaleIdentity {
        /// Operation key.
        func: String,
        /// Address that was looked up.
        address: Address,
    },

    /// The handler failed or panicked.
    #[error("handler for '{func}' failed: {source}")]
    HandlerFault {
        /// Operation key.
        func: String,
        /// Fault raised by the handler.
        #[source]
        source: HandlerFault,
    },

    /// A create targeted an address that is already live.
    #[error("'{func}' collides with live component '{address}'")]
    IdentityCollision {
        /// Operation key.
        func: String,
        /// Address that is already live.
        address: Address,
    },

    /// The payload lacks the fields the route needs.
    #[error("invalid '{func}' operation: {message}")]
    InvalidOperation {
        /// Operation key.
        func: String,
        /// Description of the problem.
        message: String,
    },
}

impl DispatchError {
    /// Creates an unresolved handler error.
    #[must_use]
    pub fn unresolved(func: impl Into<String>) -> Self {
        Self::UnresolvedHandler { func: func.into() }
    }

    /// Creates a stale identity error.
    #[must_use]
    pub fn stale(func: impl Into<String>, address: Address) -> Self {
        Self::StaleIdentity {
            func: func.into(),
            address,
        }
    }

    /// Creates a handler fault error.
    #[must_use]
    pub fn handler_fault(func: impl Into<String>, source: HandlerFault) -> Self {
        Self::HandlerFault {
            func: func.into(),
            source,
        }
    }

    /// Creates an identity collision error.
    #[must_use]
    pub fn collision(func: impl Into<String>, address: Address) -> Self {
        Self::IdentityCollision {
            func: func.into(),
            address,
        }
    }

    /// Creates an invalid operation error.
    #[must_use]
    pub fn invalid(func: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            func: func.into(),
            message: message.into(),
        }
    }

    /// Maps a tree invariant violation onto the dispatch taxonomy.
    ///
    /// A missing parent means the operation arrived after its parent was
    /// removed, so it is reported as stale.
    #[must_use]
    pub fn from_identity(func: impl Into<String>, error: IdentityError) -> Self {
        match error {
            IdentityError::Collision { address } => Self::collision(func, address),
            IdentityError::MissingParent { address } => Self::stale(func, address),
        }
    }

    /// Whether the error is a benign no-op on a vanished component.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleIdentity { .. })
    }

    /// Short name of the error class, used as a structured log field.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::UnresolvedHandler { .. } => "unresolved_handler",
            Self::StaleIdentity { .. } => "stale_identity",
            Self::HandlerFault { .. } => "handler_fault",
            Self::IdentityCollision { .. } => "identity_collision",
            Self::InvalidOperation { .. } => "invalid_operation",
        }
    }
}
