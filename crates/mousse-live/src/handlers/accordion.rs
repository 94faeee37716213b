use crate::component::{Attributes, ComponentKind, Payload};

use super::{ComponentHandler, HandlerFault, text_or};

const TITLE: &str = "title";

/// Accordion; each child becomes a collapsible item with a parent-owned title.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccordionHandler;

impl ComponentHandler for AccordionHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Accordion
    }

    fn child_attributes(&self) -> &'static [&'static str] {
        &[TITLE]
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn insert_slot(&self, payload: &Payload) -> Attributes {
        let mut slot = Attributes::new();
        slot.set(TITLE, text_or(payload, TITLE, "UNKNOWN TITLE"));
        slot
    }

    fn update_child(
        &self,
        slot: &mut Attributes,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        if attribute != TITLE {
            return Err(HandlerFault::unknown_child_attribute(self.kind(), attribute));
        }
        slot.set(TITLE, text_or(payload, TITLE, "UNKNOWN TITLE"));
        Ok(())
    }
}
