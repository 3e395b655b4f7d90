use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MetricAssessment, MetricDirection};

/// One metric compared across two windows, as returned by a metric source.
///
/// This is the normalized shape every source (analytics provider, database
/// adapter) produces before anything reaches the assessor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetricDelta {
    pub metric: String,
    pub before: f64,
    pub after: f64,
    pub change_percent: f64,
    pub direction: MetricDirection,
}

impl MetricDelta {
    /// Build a delta from raw window values.
    ///
    /// A zero baseline yields `0%` when the after value is also zero and
    /// `100%` otherwise, so a metric appearing from nothing still counts as movement.
    #[must_use]
    pub fn from_values(metric: impl Into<String>, before: f64, after: f64) -> Self {
        let change_percent = if before == 0.0 {
            if after == 0.0 { 0.0 } else { 100.0_f64.copysign(after) }
        } else {
            (after - before) / before.abs() * 100.0
        };

        Self {
            metric: metric.into(),
            before,
            after,
            change_percent,
            direction: MetricDirection::from_change_percent(change_percent),
        }
    }
}

/// A metric delta together with its classification; lives inside a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetricComparison {
    pub metric: String,
    pub before: f64,
    pub after: f64,
    pub change_percent: f64,
    pub assessment: MetricAssessment,
}
