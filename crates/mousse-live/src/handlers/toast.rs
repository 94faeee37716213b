use std::time::{Duration, Instant};

use crate::component::{
    AttrValue, Attributes, ComponentKind, ComponentTimer, Instance, Payload, Region,
};

use super::{ComponentHandler, CreateContext, HandlerFault, flag_or, nullable_text};

/// Hide delay applied when the payload does not carry a usable one.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(12_000);

/// Interval at which the relative-time label is refreshed.
pub const LABEL_REFRESH: Duration = Duration::from_secs(1);

const LABEL: &str = "label";

/// Ephemeral notification created through `notify`.
///
/// Each toast owns a timer that refreshes its "N seconds ago" label every
/// second and, when `autoHide` is set, removes the toast after `hideDelay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToastHandler;

impl ToastHandler {
    fn hide_delay(payload: &Payload) -> Duration {
        payload
            .number("hideDelay")
            .and_then(|millis| Duration::try_from_secs_f64(millis / 1000.0).ok())
            .unwrap_or(DEFAULT_HIDE_DELAY)
    }
}

impl ComponentHandler for ToastHandler {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Toast
    }

    fn home_region(&self) -> Option<Region> {
        Some(Region::Toasts)
    }

    fn constructible(&self) -> bool {
        false
    }

    fn notifies(&self) -> bool {
        true
    }

    fn create(
        &self,
        payload: &Payload,
        context: &CreateContext,
    ) -> Result<Instance, HandlerFault> {
        let auto_hide = payload.flag("autoHide", true);
        let hide_delay = Self::hide_delay(payload);
        let delay_millis = u64::try_from(hide_delay.as_millis()).unwrap_or(u64::MAX);

        let mut content = Attributes::new();
        content.set("title", nullable_text(payload, "title"));
        content.set("text", nullable_text(payload, "text"));
        content.set("animatedFade", flag_or(payload, "animatedFade", true));
        content.set("autoHide", Some(AttrValue::Flag(auto_hide)));
        content.set("hideDelay", Some(AttrValue::Millis(delay_millis)));
        content.set(LABEL, Some(AttrValue::Text(relative_label(Duration::ZERO))));

        Ok(Instance {
            content,
            wrapper: None,
            timer: Some(ComponentTimer::new(
                context.now,
                LABEL_REFRESH,
                auto_hide.then_some(hide_delay),
            )),
        })
    }

    fn tick(&self, instance: &mut Instance, now: Instant) {
        let Some(timer) = instance.timer else {
            return;
        };
        let elapsed = now.saturating_duration_since(timer.started());
        instance
            .content
            .set(LABEL, Some(AttrValue::Text(relative_label(elapsed))));
    }

    fn dismissible(&self, _instance: &Instance) -> bool {
        true
    }
}

/// Human readable age such as `1 second ago` or `3 hours ago`.
#[must_use]
pub fn relative_label(elapsed: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let seconds = elapsed.as_secs();
    let (amount, unit) = if seconds < MINUTE {
        (seconds, "second")
    } else if seconds < HOUR {
        (seconds / MINUTE, "minute")
    } else if seconds < DAY {
        (seconds / HOUR, "hour")
    } else {
        (seconds / DAY, "day")
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}
