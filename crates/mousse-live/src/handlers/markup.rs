use crate::component::{AttributeSpec, ComponentKind, Instance, Payload};

use super::{ComponentHandler, HandlerFault, text_or};

const ATTRIBUTES: &[AttributeSpec] = &[AttributeSpec::content("render")];

/// Opaque server-rendered markup inserted through a `render` payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupHandler;

impl ComponentHandler for MarkupHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Markup
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        ATTRIBUTES
    }

    fn constructible(&self) -> bool {
        false
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        if attribute != "render" {
            return Err(HandlerFault::unknown_attribute(self.kind(), attribute));
        }
        instance.content.set("render", text_or(payload, "render", ""));
        Ok(())
    }
}
