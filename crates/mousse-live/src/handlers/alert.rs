use crate::component::{AttributeSpec, Color, ComponentKind, Instance, Payload};

use super::{ComponentHandler, HandlerFault, color_or, flag_or, text_or};

const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::content("text"),
    AttributeSpec::content("color"),
    AttributeSpec::content("dismissible"),
];

/// Alert the user may close when it is dismissible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertHandler;

impl ComponentHandler for AlertHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Alert
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        ATTRIBUTES
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        let (name, value) = match attribute {
            "text" => ("text", text_or(payload, "text", "UNKNOWN")),
            "color" => ("color", color_or(payload, "color", Color::Warning)),
            "dismissible" => ("dismissible", flag_or(payload, "dismissible", true)),
            other => return Err(HandlerFault::unknown_attribute(self.kind(), other)),
        };
        instance.content.set(name, value);
        Ok(())
    }

    fn dismissible(&self, instance: &Instance) -> bool {
        instance.content.flag("dismissible")
    }
}
