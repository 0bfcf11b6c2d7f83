//! Dwell-time formatting helpers.

use std::time::Duration;

/// Seconds with two decimals, as printed in car park reports.
#[must_use]
pub fn secs_f2(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}
