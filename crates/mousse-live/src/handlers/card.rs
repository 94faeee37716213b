//! Card and the sections that live inside it.

use crate::component::{AttrValue, AttributeSpec, ComponentKind, Instance, Payload};

use super::{ComponentHandler, HandlerFault, flag_or, nullable_color, nullable_text};

const CARD_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::content("color"),
    AttributeSpec::content("isContentCenter"),
    AttributeSpec::content("borderColor"),
    AttributeSpec::content("title"),
    AttributeSpec::content("text"),
];

const SECTION_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::content("text"),
    AttributeSpec::content("isTransparent"),
];

const TEXT_ATTRIBUTES: &[AttributeSpec] = &[AttributeSpec::content("text")];

const BORDER_COLOR: &str = "borderColor";

/// Card container; its border colour is shared with header and footer
/// children.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardHandler;

impl ComponentHandler for CardHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Card
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        CARD_ATTRIBUTES
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        let (name, value) = match attribute {
            "color" => ("color", nullable_color(payload, "color")),
            "isContentCenter" => ("isContentCenter", flag_or(payload, "isContentCenter", false)),
            "borderColor" => (BORDER_COLOR, nullable_color(payload, BORDER_COLOR)),
            "title" => ("title", nullable_text(payload, "title")),
            "text" => ("text", nullable_text(payload, "text")),
            other => return Err(HandlerFault::unknown_attribute(self.kind(), other)),
        };
        instance.content.set(name, value);
        Ok(())
    }

    fn cascade(&self, parent: &Instance, child_kind: ComponentKind, child: &mut Instance) {
        if matches!(child_kind, ComponentKind::CardHeader | ComponentKind::CardFooter) {
            let border = parent.content.color(BORDER_COLOR).map(AttrValue::Color);
            child.content.set(BORDER_COLOR, border);
        }
    }
}

/// Card header or footer strip.
#[derive(Debug, Clone, Copy)]
pub struct CardSectionHandler {
    kind: ComponentKind,
}

impl CardSectionHandler {
    /// Handler serving `kind` as a card section.
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }
}

impl ComponentHandler for CardSectionHandler {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        SECTION_ATTRIBUTES
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        let (name, value) = match attribute {
            "text" => ("text", nullable_text(payload, "text")),
            "isTransparent" => ("isTransparent", flag_or(payload, "isTransparent", false)),
            other => return Err(HandlerFault::unknown_attribute(self.kind, other)),
        };
        instance.content.set(name, value);
        Ok(())
    }
}

/// Single line of card text: title, subtitle, or paragraph.
#[derive(Debug, Clone, Copy)]
pub struct CardTextHandler {
    kind: ComponentKind,
}

impl CardTextHandler {
    /// Handler serving `kind` as a text line.
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }
}

impl ComponentHandler for CardTextHandler {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        TEXT_ATTRIBUTES
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        if attribute != "text" {
            return Err(HandlerFault::unknown_attribute(self.kind, attribute));
        }
        instance.content.set("text", nullable_text(payload, "text"));
        Ok(())
    }
}
