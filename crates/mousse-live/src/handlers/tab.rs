use crate::component::{
    AttrValue, AttributeSpec, Attributes, ComponentKind, Instance, Payload, Region,
};

use super::{ComponentHandler, HandlerFault};

const ATTRIBUTES: &[AttributeSpec] = &[AttributeSpec::content("title")];
const SIZE: &str = "size";
const GRID_SIZES: [u8; 4] = [5, 4, 3, 2];

/// Tab pane; attaches itself to the tab region and lays children out in a
/// grid whose cell size the tab owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabHandler;

impl TabHandler {
    fn size(payload: &Payload) -> AttrValue {
        let requested = payload.number(SIZE).unwrap_or(1.0).clamp(1.0, 5.0);
        let size = GRID_SIZES
            .into_iter()
            .find(|size| requested >= f64::from(*size))
            .unwrap_or(1);
        AttrValue::Size(size)
    }
}

impl ComponentHandler for TabHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Tab
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        ATTRIBUTES
    }

    fn child_attributes(&self) -> &'static [&'static str] {
        &[SIZE]
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn home_region(&self) -> Option<Region> {
        Some(Region::Tabs)
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        if attribute != "title" {
            return Err(HandlerFault::unknown_attribute(self.kind(), attribute));
        }
        let title = payload
            .text("title")
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| "UNKNOWN".to_owned());
        instance.content.set("title", Some(AttrValue::Text(title)));
        Ok(())
    }

    fn insert_slot(&self, payload: &Payload) -> Attributes {
        let mut slot = Attributes::new();
        slot.set(SIZE, Some(Self::size(payload)));
        slot
    }

    fn update_child(
        &self,
        slot: &mut Attributes,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        if attribute != SIZE {
            return Err(HandlerFault::unknown_child_attribute(self.kind(), attribute));
        }
        slot.set(SIZE, Some(Self::size(payload)));
        Ok(())
    }
}
