use crate::component::{AttrValue, AttributeSpec, Color, ComponentKind, Instance, Payload, Width};

use super::{ComponentHandler, HandlerFault, color_or, flag_or, text_or};

const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::content("color"),
    AttributeSpec::content("colorOutline"),
    AttributeSpec::content("text"),
    AttributeSpec::content("disable"),
    AttributeSpec::content("width"),
    AttributeSpec::content("center"),
];

/// Clickable button; clicks are reported back to the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonHandler;

impl ComponentHandler for ButtonHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Button
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
            "color" => ("color", color_or(payload, "color", Color::Primary)),
            "colorOutline" => ("colorOutline", flag_or(payload, "colorOutline", false)),
            "text" => ("text", text_or(payload, "text", "")),
            "disable" => ("disable", flag_or(payload, "disable", false)),
            "width" => (
                "width",
                Some(AttrValue::Width(payload.width("width").unwrap_or(Width::Full))),
            ),
            "center" => ("center", flag_or(payload, "center", true)),
            other => return Err(HandlerFault::unknown_attribute(self.kind(), other)),
        };
        instance.content.set(name, value);
        Ok(())
    }
}
