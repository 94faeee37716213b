use std::time::Duration;

/// Default base URL of the server publishing live updates.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default liveness probe interval while the update channel is open.
pub const DEFAULT_PROBE_INTERVAL_SECS: f64 = 1.0;

/// Default liveness probe interval while waiting for the server to return.
pub const DEFAULT_RECONNECT_PROBE_INTERVAL_SECS: f64 = 2.0;

/// Lower bound applied to every probe interval.
pub const MIN_PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Default log filter expression used by the binaries.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Owned server URL used where allocation is required (e.g. serde).
#[must_use]
pub fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_owned()
}

/// Probe interval used while connected.
#[must_use]
pub const fn default_probe_interval_secs() -> f64 {
    DEFAULT_PROBE_INTERVAL_SECS
}

/// Probe interval used while disconnected.
#[must_use]
pub const fn default_reconnect_probe_interval_secs() -> f64 {
    DEFAULT_RECONNECT_PROBE_INTERVAL_SECS
}

/// Converts a configured interval in seconds into a [`Duration`], never
/// returning less than [`MIN_PROBE_INTERVAL`].
///
/// Non-finite and negative values collapse to the minimum.
#[must_use]
pub fn clamp_probe_interval(seconds: f64) -> Duration {
    if !seconds.is_finite() {
        return MIN_PROBE_INTERVAL;
    }
    Duration::try_from_secs_f64(seconds)
        .map_or(MIN_PROBE_INTERVAL, |interval| interval.max(MIN_PROBE_INTERVAL))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::default(1.0, Duration::from_secs(1))]
    #[case::below_minimum(0.1, MIN_PROBE_INTERVAL)]
    #[case::negative(-3.0, MIN_PROBE_INTERVAL)]
    #[case::not_a_number(f64::NAN, MIN_PROBE_INTERVAL)]
    #[case::infinite(f64::INFINITY, MIN_PROBE_INTERVAL)]
    #[case::fractional(2.5, Duration::from_millis(2500))]
    fn clamps_probe_intervals(#[case] seconds: f64, #[case] expected: Duration) {
        assert_eq!(clamp_probe_interval(seconds), expected);
    }
}
