//! Identity map of live component instances.
//!
//! The [`Tree`] is the explicit address-to-instance map the dispatcher mutates.
//! It is independent of any render surface: it records the parent/child
//! structure, singleton regions, wrapper aliases, and the timers owned by each
//! instance.

mod address;
mod tree;

pub use address::{Address, WRAPPER_SUFFIX};
pub use tree::{IdentityError, Node, NodeSnapshot, Placement, Tree, TreeSnapshot};
