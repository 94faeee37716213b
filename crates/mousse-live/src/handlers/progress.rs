use crate::component::{AttrValue, AttributeSpec, ComponentKind, Instance, Payload};

use super::{ComponentHandler, HandlerFault, flag_or, nullable_color, text_or};

const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::content("percentage"),
    AttributeSpec::content("showLabel"),
    AttributeSpec::wrapper("ariaLabel"),
    AttributeSpec::content("isStriped"),
    AttributeSpec::content("color"),
];

const PERCENTAGE: &str = "percentage";
const LABEL: &str = "label";
const VALUE_NOW: &str = "valueNow";

/// Progress bar whose accessibility attributes live on a `-root` wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressBarHandler;

impl ProgressBarHandler {
    fn refresh_derived(instance: &mut Instance) {
        let percentage = instance
            .content
            .text(PERCENTAGE)
            .unwrap_or("0")
            .to_owned();
        let label = instance
            .content
            .flag("showLabel")
            .then(|| AttrValue::Text(progress_label(&percentage)));
        instance.content.set(LABEL, label);
        instance
            .wrapper
            .get_or_insert_with(Default::default)
            .set(VALUE_NOW, Some(AttrValue::Text(percentage)));
    }
}

impl ComponentHandler for ProgressBarHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::ProgressBar
    }

    fn attributes(&self) -> &'static [AttributeSpec] {
        ATTRIBUTES
    }

    fn has_wrapper(&self) -> bool {
        true
    }

    fn update(
        &self,
        instance: &mut Instance,
        attribute: &str,
        payload: &Payload,
    ) -> Result<(), HandlerFault> {
        match attribute {
            "percentage" => instance
                .content
                .set(PERCENTAGE, text_or(payload, PERCENTAGE, "0")),
            "showLabel" => instance
                .content
                .set("showLabel", flag_or(payload, "showLabel", false)),
            "ariaLabel" => instance
                .wrapper
                .get_or_insert_with(Default::default)
                .set("ariaLabel", text_or(payload, "ariaLabel", "Unknown")),
            "isStriped" => instance
                .content
                .set("isStriped", flag_or(payload, "isStriped", false)),
            "color" => instance.content.set("color", nullable_color(payload, "color")),
            other => return Err(HandlerFault::unknown_attribute(self.kind(), other)),
        }
        Self::refresh_derived(instance);
        Ok(())
    }
}

/// Label shown on a progress bar: the percentage cut to two decimals, then `%`.
#[must_use]
pub fn progress_label(percentage: &str) -> String {
    let truncated = percentage
        .find('.')
        .and_then(|dot| percentage.get(..(dot + 3).min(percentage.len())))
        .unwrap_or(percentage);
    format!("{truncated}%")
}
