//! Frame decoding and ordered operation dispatch.
//!
//! A frame is decoded into [`Entry`] values, one per array element. Each
//! [`Operation`] resolves through the [`HandlerRegistry`] to a closed
//! [`Route`]; an element that is not an operation is reported in place. The
//! [`Dispatcher`] applies operations one at a time against the
//! [`Tree`](crate::identity::Tree), isolating failures per operation and
//! recording them in a [`FrameReport`].

mod decoder;
mod dispatcher;
mod errors;
mod operation;
mod registry;
mod report;

pub use decoder::{DecodeError, Entry, Frame, decode};
pub use dispatcher::Dispatcher;
pub use errors::DispatchError;
pub use operation::Operation;
pub use registry::{HandlerRegistry, NOTIFY_FUNC, REMOVE_COMPONENT_FUNC, Route, Verb};
pub use report::{Applied, FrameReport, OperationOutcome, TickReport};

/// Tracing target for decoding and dispatch.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::dispatch");
