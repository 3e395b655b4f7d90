//! Horizon scheduler.

use chrono::{DateTime, Utc};
use vigil_core::enums::Horizon;

/// Horizons that are due for a change and not yet evaluated, in ascending order.
///
/// A horizon is due once the whole number of days elapsed since detection
/// reaches it. Calling this again before acting on the result returns the
/// same set, and never a horizon present in `evaluated`.
#[must_use]
pub fn due_horizons(
    detected_at: DateTime<Utc>,
    now: DateTime<Utc>,
    evaluated: &[Horizon],
) -> Vec<Horizon> {
    let elapsed_days = (now - detected_at).num_days();
    if elapsed_days <= 0 {
        return Vec::new();
    }

    Horizon::ALL
        .into_iter()
        .filter(|h| elapsed_days >= i64::from(h.days()))
        .filter(|h| !evaluated.contains(h))
        .collect()
}
