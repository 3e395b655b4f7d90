//! Metric assessor.
//!
//! Each metric is classified on its own, then the list is reduced with a
//! pessimistic priority: one regressing metric vetoes any number of improving ones.

use vigil_core::entities::{MetricComparison, MetricDelta};
use vigil_core::enums::{Assessment, MetricAssessment};

/// Minimum absolute percent change for a metric to count as moved.
pub const SIGNIFICANCE_THRESHOLD_PERCENT: f64 = 5.0;

/// Metric polarity: which metrics improve when they go down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentPolicy {
    lower_is_better: Vec<String>,
}

impl AssessmentPolicy {
    #[must_use]
    pub fn new<I, S>(lower_is_better: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lower_is_better: lower_is_better.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_lower_better(&self, metric: &str) -> bool {
        self.lower_is_better.iter().any(|m| m == metric)
    }
}

impl Default for AssessmentPolicy {
    fn default() -> Self {
        Self::new(["bounce_rate"])
    }
}

/// Classify one metric's percent change.
///
/// Changes with an absolute value below the threshold are noise. Exactly 5%
/// counts as movement.
#[must_use]
pub fn classify_metric(
    metric: &str,
    change_percent: f64,
    policy: &AssessmentPolicy,
) -> MetricAssessment {
    if !change_percent.is_finite() || change_percent.abs() < SIGNIFICANCE_THRESHOLD_PERCENT {
        return MetricAssessment::Neutral;
    }

    let went_up = change_percent > 0.0;
    if went_up != policy.is_lower_better(metric) {
        MetricAssessment::Improved
    } else {
        MetricAssessment::Regressed
    }
}

/// Reduce per-metric classifications to one verdict.
///
/// Empty input is `inconclusive`; otherwise regressed beats improved beats neutral.
#[must_use]
pub fn reduce_assessments<I>(assessments: I) -> Assessment
where
    I: IntoIterator<Item = MetricAssessment>,
{
    let mut seen_any = false;
    let mut improved = false;
    for assessment in assessments {
        seen_any = true;
        match assessment {
            MetricAssessment::Regressed => return Assessment::Regressed,
            MetricAssessment::Improved => improved = true,
            MetricAssessment::Neutral => {}
        }
    }

    if !seen_any {
        Assessment::Inconclusive
    } else if improved {
        Assessment::Improved
    } else {
        Assessment::Neutral
    }
}

/// Classify every delta and reduce them into an overall assessment.
///
/// Deltas from any number of sources compose here; a source that produced
/// nothing simply contributes no entries.
#[must_use]
pub fn assess_metrics(
    deltas: &[MetricDelta],
    policy: &AssessmentPolicy,
) -> (Vec<MetricComparison>, Assessment) {
    let comparisons: Vec<MetricComparison> = deltas
        .iter()
        .map(|delta| MetricComparison {
            metric: delta.metric.clone(),
            before: delta.before,
            after: delta.after,
            change_percent: delta.change_percent,
            assessment: classify_metric(&delta.metric, delta.change_percent, policy),
        })
        .collect();

    let overall = reduce_assessments(comparisons.iter().map(|c| c.assessment));
    (comparisons, overall)
}
