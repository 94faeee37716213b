//! Render-surface independent model of component instances.
//!
//! Instances hold typed attribute bags rather than markup. Handlers in
//! [`crate::handlers`] populate and mutate them; the [`crate::identity::Tree`]
//! owns them.

mod payload;
mod timer;

use std::collections::BTreeMap;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub use payload::Payload;
pub use timer::ComponentTimer;

/// Component types known to the builtin widget set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ComponentKind {
    /// Plain grouping container.
    Container,
    /// Clickable button emitting `click` events.
    Button,
    /// User-dismissible alert.
    Alert,
    /// Card with optional title and text.
    Card,
    /// Body section of a card.
    CardBody,
    /// Header strip of a card.
    CardHeader,
    /// Footer strip of a card.
    CardFooter,
    /// Card title line.
    CardTitle,
    /// Card subtitle line.
    CardSubtitle,
    /// Card paragraph.
    CardText,
    /// Progress bar with a `-root` wrapper.
    ProgressBar,
    /// Accordion whose children are collapsible items.
    Accordion,
    /// Tab pane attached to the tab region.
    Tab,
    /// Ephemeral notification.
    Toast,
    /// Opaque server-rendered markup.
    Markup,
}

/// Bootstrap theme colours accepted by colour attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Color {
    /// `primary`.
    Primary,
    /// `secondary`.
    Secondary,
    /// `success`.
    Success,
    /// `danger`.
    Danger,
    /// `warning`.
    Warning,
    /// `info`.
    Info,
    /// `light`.
    Light,
    /// `dark`.
    Dark,
    /// `white`.
    White,
    /// `black`.
    Black,
    /// `body`.
    Body,
}

/// Bootstrap width utilities accepted by width attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Width {
    /// `w-25`.
    #[serde(rename = "25")]
    #[strum(serialize = "25")]
    Quarter,
    /// `w-50`.
    #[serde(rename = "50")]
    #[strum(serialize = "50")]
    Half,
    /// `w-75`.
    #[serde(rename = "75")]
    #[strum(serialize = "75")]
    ThreeQuarters,
    /// `w-100`.
    #[serde(rename = "100")]
    #[strum(serialize = "100")]
    Full,
    /// `w-auto`.
    #[serde(rename = "auto")]
    #[strum(serialize = "auto")]
    Auto,
}

/// Value of a single component attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Free text.
    Text(String),
    /// Boolean switch.
    Flag(bool),
    /// Theme colour.
    Color(Color),
    /// Width utility.
    Width(Width),
    /// Grid size between 1 and 5.
    Size(u8),
    /// Duration in milliseconds.
    Millis(u64),
}

/// Attribute bag of one surface of a component.
///
/// An absent key means the attribute is unset, which for nullable text marks
/// the element as hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<&'static str, AttrValue>);

impl Attributes {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, or clears it when `value` is `None`.
    pub fn set(&mut self, name: &'static str, value: Option<AttrValue>) {
        match value {
            Some(value) => {
                self.0.insert(name, value);
            }
            None => {
                self.0.remove(name);
            }
        }
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Text stored under `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(AttrValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Flag stored under `name`, `false` when unset.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(AttrValue::Flag(true)))
    }

    /// Colour stored under `name`.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<Color> {
        match self.get(name) {
            Some(AttrValue::Color(color)) => Some(*color),
            _ => None,
        }
    }

    /// Number of set attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which address of a component an attribute lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// The addressable content node.
    Content,
    /// The `-root` wrapper around the content node.
    Wrapper,
}

/// Declaration of one updatable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Attribute name as used in `update_<name>` routes.
    pub name: &'static str,
    /// Surface the attribute is applied to.
    pub surface: Surface,
}

impl AttributeSpec {
    /// Attribute living on the content node.
    #[must_use]
    pub const fn content(name: &'static str) -> Self {
        Self {
            name,
            surface: Surface::Content,
        }
    }

    /// Attribute living on the wrapper node.
    #[must_use]
    pub const fn wrapper(name: &'static str) -> Self {
        Self {
            name,
            surface: Surface::Wrapper,
        }
    }
}

/// Singleton regions some components attach to instead of a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    /// Tab navigation and panes.
    Tabs,
    /// Ephemeral notification stack.
    Toasts,
}

/// State of one live component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instance {
    /// Attributes of the content node.
    pub content: Attributes,
    /// Attributes of the wrapper node, for types that own one.
    pub wrapper: Option<Attributes>,
    /// Timer owned by this instance; dropped with it.
    pub timer: Option<ComponentTimer>,
}

impl Instance {
    /// Instance with the given content attributes.
    #[must_use]
    pub fn with_content(content: Attributes) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }
}
