use std::time::{Duration, Instant};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Periodic refresh owned by one component instance.
///
/// The timer starts when the instance is created and disappears with it; the
/// tree never cancels it any other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentTimer {
    started: Instant,
    period: Duration,
    next_due: Instant,
    expires_at: Option<Instant>,
}

impl ComponentTimer {
    /// Timer firing every `period` from `started`, optionally expiring the
    /// instance after `lifetime`.
    ///
    /// A lifetime reaching past the representable clock never expires.
    #[must_use]
    pub fn new(started: Instant, period: Duration, lifetime: Option<Duration>) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            started,
            period,
            next_due: started + period,
            expires_at: lifetime.and_then(|lifetime| started.checked_add(lifetime)),
        }
    }

    /// Creation instant of the owning instance.
    #[must_use]
    pub const fn started(&self) -> Instant {
        self.started
    }

    /// Earliest instant at which the timer needs attention.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.expires_at
            .map_or(self.next_due, |expiry| expiry.min(self.next_due))
    }

    /// Whether the owning instance has outlived its lifetime.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    /// Whether a refresh is due.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due <= now
    }

    /// Moves the next refresh past `now`, skipping missed periods.
    pub fn advance(&mut self, now: Instant) {
        while self.next_due <= now {
            self.next_due += self.period;
        }
    }
}
