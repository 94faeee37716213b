//! Per-frame record of what each operation did.

use crate::identity::Address;

use super::decoder::DecodeError;
use super::errors::DispatchError;

/// Effect of one successfully applied operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new instance went live at the address.
    Created(Address),
    /// An attribute of the instance changed.
    Updated(Address),
    /// These instances were removed, the targeted one first.
    Removed(Vec<Address>),
}

/// Outcome of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Operation key as received.
    pub func: String,
    /// What happened.
    pub result: Result<Applied, DispatchError>,
}

/// Outcome of one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    decode_error: Option<DecodeError>,
    outcomes: Vec<OperationOutcome>,
}

impl FrameReport {
    /// Report for a frame that failed to decode.
    #[must_use]
    pub fn rejected(error: DecodeError) -> Self {
        Self {
            decode_error: Some(error),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: OperationOutcome) {
        self.outcomes.push(outcome);
    }

    /// Decode failure that dropped the frame, if any.
    #[must_use]
    pub fn decode_error(&self) -> Option<&DecodeError> {
        self.decode_error.as_ref()
    }

    /// Outcomes in application order.
    #[must_use]
    pub fn outcomes(&self) -> &[OperationOutcome] {
        &self.outcomes
    }

    /// Number of operations that took effect.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    /// Errors in application order.
    pub fn errors(&self) -> impl Iterator<Item = &DispatchError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err())
    }
}

/// Outcome of servicing component timers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Instances whose timer-driven state was refreshed.
    pub refreshed: Vec<Address>,
    /// Instances removed because their lifetime ran out.
    pub expired: Vec<Address>,
}
