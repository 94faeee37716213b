//! Handler capability interface and the builtin widget set.
//!
//! The dispatcher only ever talks to component types through
//! [`ComponentHandler`]. A handler declares what its type supports (updatable
//! attributes, child slots, wrapper ownership, home region) and implements the
//! attribute-level semantics; it never produces markup.

mod accordion;
mod alert;
mod button;
mod card;
mod container;
mod markup;
mod progress;
mod tab;
mod toast;

use std::time::Instant;

use thiserror::Error;

use crate::component::{
    AttrValue, AttributeSpec, Attributes, Color, ComponentKind, Instance, Payload, Region,
    Surface,
};

pub use accordion::AccordionHandler;
pub use alert::AlertHandler;
pub use button::ButtonHandler;
pub use card::{CardHandler, CardSectionHandler, CardTextHandler};
pub use container::ContainerHandler;
pub use markup::MarkupHandler;
pub use progress::{ProgressBarHandler, progress_label};
pub use tab::TabHandler;
pub use toast::{ToastHandler, relative_label};

/// Context available while constructing an instance.
#[derive(Debug, Clone, Copy)]
pub struct CreateContext {
    /// Instant the operation is applied at; component timers start here.
    pub now: Instant,
}

/// Failure raised by a handler while applying one operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerFault {
    /// The attribute is not declared by the component type.
    #[error("{kind} has no attribute '{attribute}'")]
    UnknownAttribute {
        /// Component type.
        kind: ComponentKind,
        /// Attribute that was requested.
        attribute: String,
    },
    /// The component type does not own parent-side child attributes.
    #[error("{kind} has no child attribute '{attribute}'")]
    UnknownChildAttribute {
        /// Component type.
        kind: ComponentKind,
        /// Attribute that was requested.
        attribute: String,
    },
    /// The handler panicked; the message is the panic payload when textual.
    #[error("handler panicked: {message}")]
    Panicked {
        /// Panic payload.
        message: String,
    },
}

impl HandlerFault {
    /// Creates an unknown attribute fault.
    #[must_use]
    pub fn unknown_attribute(kind: ComponentKind, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            kind,
            attribute: attribute.into(),
        }
    }

    /// Creates an unknown child attribute fault.
    #[must_use]
    pub fn unknown_child_attribute(kind: ComponentKind, attribute: impl Into<String>) -> Self {
        Self::UnknownChildAttribute {
            kind,
            attribute: attribute.into(),
        }
    }

    /// Creates a fault from a caught panic payload.
    #[must_use]
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked {
            message: message.into(),
        }
    }
}

/// Per component-type capabilities invoked by the dispatcher.
///
/// `update` must be idempotent and independent of the order in which distinct
/// attributes are updated. Removal is performed by the tree and needs no
/// handler involvement.
pub trait ComponentHandler: Send + Sync {
    /// Component type served by this handler.
    fn kind(&self) -> ComponentKind;

    /// Attributes reachable through `<kind>_update_<attribute>`.
    fn attributes(&self) -> &'static [AttributeSpec] {
        &[]
    }

    /// Parent-owned attributes reachable through
    /// `<kind>_update_child_<attribute>`.
    fn child_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether `<kind>_insert` and `<kind>_remove_child` apply.
    fn accepts_children(&self) -> bool {
        false
    }

    /// Whether instances own a `-root` wrapper address.
    fn has_wrapper(&self) -> bool {
        false
    }

    /// Region the type attaches itself to instead of a parent.
    fn home_region(&self) -> Option<Region> {
        None
    }

    /// Whether `<kind>_new` and `<kind>_remove` apply.
    fn constructible(&self) -> bool {
        true
    }

    /// Whether `<kind>_notify` applies.
    fn notifies(&self) -> bool {
        false
    }

    /// Surface `attribute` lives on, if declared.
    fn surface_of(&self, attribute: &str) -> Option<Surface> {
        self.attributes()
            .iter()
            .find(|spec| spec.name == attribute)
            .map(|spec| spec.surface)
    }

    /// Builds an unattached instance from the operation payload.
    ///
    /// The default applies every declared attribute in turn, so a freshly
    /// created instance always equals one updated attribute by attribute.
    ///
    /// # Errors
    ///
    /// Propagates the first [`HandlerFault`] raised by [`Self::update`].
    fn create(
        &self,
        payload: &Payload,
        _context: &CreateContext,
    ) -> Result<Instance, HandlerFault> {
        let mut instance = Instance {
            wrapper: self.has_wrapper().then(Attributes::new),
            ..Instance::default()
        };
        for spec in self.attributes() {
            self.update(&mut instance, spec.name, payload)?;
        }
        Ok(instance)
    }

    /// Sets one attribute from the payload.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerFault::UnknownAttribute`] for undeclared attributes.
    fn update(
        &self,
        _instance: &mut Instance,
        attribute: &str,
        _payload: &Payload,
    ) -> Result<(), HandlerFault> {
        Err(HandlerFault::unknown_attribute(self.kind(), attribute))
    }

    /// Parent-owned attributes for a child inserted through `<kind>_insert`.
    fn insert_slot(&self, _payload: &Payload) -> Attributes {
        Attributes::new()
    }

    /// Sets one parent-owned attribute on a child.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerFault::UnknownChildAttribute`] for undeclared
    /// attributes.
    fn update_child(
        &self,
        _slot: &mut Attributes,
        attribute: &str,
        _payload: &Payload,
    ) -> Result<(), HandlerFault> {
        Err(HandlerFault::unknown_child_attribute(self.kind(), attribute))
    }

    /// Propagates parent attributes onto a direct child.
    fn cascade(&self, _parent: &Instance, _child_kind: ComponentKind, _child: &mut Instance) {}

    /// Refreshes timer-driven state.
    fn tick(&self, _instance: &mut Instance, _now: Instant) {}

    /// Whether the user may close the instance.
    fn dismissible(&self, _instance: &Instance) -> bool {
        false
    }
}

/// Handlers for every builtin component type.
#[must_use]
pub fn builtin_handlers() -> Vec<Box<dyn ComponentHandler>> {
    vec![
        Box::new(ContainerHandler::new(ComponentKind::Container)),
        Box::new(ContainerHandler::new(ComponentKind::CardBody)),
        Box::new(ButtonHandler),
        Box::new(AlertHandler),
        Box::new(CardHandler),
        Box::new(CardSectionHandler::new(ComponentKind::CardHeader)),
        Box::new(CardSectionHandler::new(ComponentKind::CardFooter)),
        Box::new(CardTextHandler::new(ComponentKind::CardTitle)),
        Box::new(CardTextHandler::new(ComponentKind::CardSubtitle)),
        Box::new(CardTextHandler::new(ComponentKind::CardText)),
        Box::new(ProgressBarHandler),
        Box::new(AccordionHandler),
        Box::new(TabHandler),
        Box::new(ToastHandler),
        Box::new(MarkupHandler),
    ]
}

fn text_or(payload: &Payload, key: &str, default: &str) -> Option<AttrValue> {
    Some(AttrValue::Text(
        payload.text(key).unwrap_or_else(|| default.to_owned()),
    ))
}

fn nullable_text(payload: &Payload, key: &str) -> Option<AttrValue> {
    payload.text(key).map(AttrValue::Text)
}

fn flag_or(payload: &Payload, key: &str, default: bool) -> Option<AttrValue> {
    Some(AttrValue::Flag(payload.flag(key, default)))
}

fn color_or(payload: &Payload, key: &str, default: Color) -> Option<AttrValue> {
    Some(AttrValue::Color(payload.color(key).unwrap_or(default)))
}

fn nullable_color(payload: &Payload, key: &str) -> Option<AttrValue> {
    payload.color(key).map(AttrValue::Color)
}
