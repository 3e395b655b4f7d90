//! Turn one evaluated horizon into engine commands.
//!
//! This is the only place the pure engine assembles a [`Checkpoint`]. The
//! imperative shell executes the returned commands in order.

use chrono::{DateTime, Utc};
use vigil_core::commands::EngineCommand;
use vigil_core::entities::{Checkpoint, DetectedChange, MetricComparison, MetricDelta};
use vigil_core::enums::{Horizon, MetricAssessment};

use crate::assess::{AssessmentPolicy, assess_metrics};
use crate::transition::{EarlyResolutionPolicy, resolve_early_transition, resolve_status_transition};
use crate::windows::compute_windows;

/// Everything known about one `(change, horizon)` evaluation.
#[derive(Debug, Clone)]
pub struct CheckpointInput<'a> {
    pub change: &'a DetectedChange,
    pub horizon: Horizon,
    /// Deltas from every source that answered; may be empty.
    pub deltas: &'a [MetricDelta],
    /// Checkpoints already recorded for this change.
    pub prior: &'a [Checkpoint],
    pub checkpoint_id: String,
    pub computed_at: DateTime<Utc>,
}

/// Plan the commands for one evaluated horizon.
///
/// Always yields an `AppendCheckpoint`, terminal changes included, so audit
/// history keeps growing after the status is frozen. An `ApplyTransition`
/// follows when the state machine moves the status.
#[must_use]
pub fn plan_checkpoint(
    input: CheckpointInput<'_>,
    policy: &AssessmentPolicy,
) -> Vec<EngineCommand> {
    let CheckpointInput {
        change,
        horizon,
        deltas,
        prior,
        checkpoint_id,
        computed_at,
    } = input;

    let windows = compute_windows(change.first_detected_at, horizon);
    let (metrics, assessment) = assess_metrics(deltas, policy);
    let reasoning = summarize(&metrics);

    let transition = if horizon.is_early() {
        resolve_early_transition(
            EarlyResolutionPolicy::Disabled,
            change.status,
            horizon,
            assessment,
        )
    } else {
        resolve_status_transition(change.status, horizon, assessment, prior)
    };

    tracing::debug!(
        change_id = %change.id,
        %horizon,
        %assessment,
        metrics = metrics.len(),
        transition = transition.as_ref().map(|t| t.new_status.as_str()),
        "planned checkpoint"
    );

    let mut commands = vec![EngineCommand::AppendCheckpoint {
        checkpoint: Checkpoint {
            id: checkpoint_id,
            change_id: change.id.clone(),
            horizon,
            windows,
            metrics,
            assessment,
            reasoning,
            computed_at,
        },
    }];

    if let Some(transition) = transition {
        commands.push(EngineCommand::ApplyTransition {
            change_id: change.id.clone(),
            from: change.status,
            transition,
        });
    }

    commands
}

/// Short explanation of which metrics moved.
fn summarize(metrics: &[MetricComparison]) -> Option<String> {
    if metrics.is_empty() {
        return Some("no metric source returned data".to_string());
    }

    let moved: Vec<String> = metrics
        .iter()
        .filter(|m| m.assessment != MetricAssessment::Neutral)
        .map(|m| format!("{} {:+.1}% ({})", m.metric, m.change_percent, m.assessment))
        .collect();

    if moved.is_empty() {
        Some(format!(
            "all {} metrics within the significance threshold",
            metrics.len()
        ))
    } else {
        Some(moved.join(", "))
    }
}
