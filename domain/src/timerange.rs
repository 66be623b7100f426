//! Natural-language time range parsing.
//!
//! Operators ask for "the last 30 minutes" or "2 days"; handlers need a
//! duration to compute the epoch window. Unrecognized input falls back to
//! one hour rather than failing the whole tool call.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Fallback window when the range cannot be parsed.
pub const DEFAULT_RANGE: Duration = Duration::from_secs(3600);

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(minutes?|hours?|days?|weeks?|months?)").expect("range pattern")
});

fn unit_seconds(unit: &str) -> u64 {
    if unit.starts_with("minute") {
        60
    } else if unit.starts_with("hour") {
        3600
    } else if unit.starts_with("day") {
        86_400
    } else if unit.starts_with("week") {
        604_800
    } else {
        // month, approximated at 30 days
        2_592_000
    }
}

/// Parse a plain-English time range into a duration.
///
/// Accepts `"<n> <unit>"` for minute/hour/day/week/month units. Input that
/// only names a unit ("an hour ago") gets one of that unit. Anything else
/// gets [`DEFAULT_RANGE`].
pub fn parse_time_range(text: &str) -> Duration {
    let lower = text.trim().to_lowercase();

    if let Some(caps) = RANGE_PATTERN.captures(&lower)
        && let Ok(count) = caps[1].parse::<u64>()
    {
        return Duration::from_secs(count * unit_seconds(&caps[2]));
    }

    // Unit-only fallbacks
    for unit in ["minute", "hour", "day", "week", "month"] {
        if lower.contains(unit) {
            return Duration::from_secs(unit_seconds(unit));
        }
    }

    DEFAULT_RANGE
}
