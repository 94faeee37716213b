use crate::component::ComponentKind;

use super::ComponentHandler;

/// Attribute-less grouping node (`container`, `cardBody`).
#[derive(Debug, Clone, Copy)]
pub struct ContainerHandler {
    kind: ComponentKind,
}

impl ContainerHandler {
    /// Handler serving `kind` as a plain container.
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }
}

impl ComponentHandler for ContainerHandler {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn accepts_children(&self) -> bool {
        true
    }
}
