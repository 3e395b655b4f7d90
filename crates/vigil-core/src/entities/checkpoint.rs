use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::MetricComparison;
use crate::enums::{Assessment, Horizon};

/// Before/after comparison intervals for one horizon.
///
/// `before_*` align on UTC midnights; `after_start` is the detection instant.
/// Both ends are exclusive of `*_end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ComparisonWindows {
    pub before_start: DateTime<Utc>,
    pub before_end: DateTime<Utc>,
    pub after_start: DateTime<Utc>,
    pub after_end: DateTime<Utc>,
}

/// Immutable evaluation of one detected change at one horizon.
///
/// A later horizon produces a new checkpoint; existing ones are never edited.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Checkpoint {
    pub id: String,
    pub change_id: String,
    #[schemars(with = "u32")]
    pub horizon: Horizon,
    pub windows: ComparisonWindows,
    pub metrics: Vec<MetricComparison>,
    pub assessment: Assessment,
    pub reasoning: Option<String>,
    pub computed_at: DateTime<Utc>,
}
