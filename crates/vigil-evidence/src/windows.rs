//! Window calculator.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use vigil_core::entities::ComparisonWindows;
use vigil_core::enums::Horizon;

/// UTC midnight of the day containing `instant`.
#[must_use]
pub fn utc_midnight(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Compute the before/after windows for a change detected at `detected_at`.
///
/// The before window is `horizon` whole days ending at the detection day's
/// midnight. The after window starts at the detection instant itself, so
/// same-day traffic from before the change is never counted as after, and
/// ends `horizon` days after that midnight.
#[must_use]
pub fn compute_windows(detected_at: DateTime<Utc>, horizon: Horizon) -> ComparisonWindows {
    let midnight = utc_midnight(detected_at);
    let span = TimeDelta::days(i64::from(horizon.days()));

    ComparisonWindows {
        before_start: midnight - span,
        before_end: midnight,
        after_start: detected_at,
        after_end: midnight + span,
    }
}
