//! Human-readable checkpoint history and per-horizon chips.
//!
//! The digest feeds the next LLM prompt and is lossy on purpose: one line
//! per change, horizons inline, only the strongest metric per horizon.

use std::fmt::Write;

use vigil_core::entities::{Checkpoint, ChipState, DetectedChange, HorizonChip, MetricComparison};
use vigil_core::enums::Horizon;

/// Render checkpoint history grouped by change.
///
/// Changes without checkpoints are skipped. Returns an empty string when
/// there is nothing to report.
#[must_use]
pub fn format_checkpoint_digest(changes: &[DetectedChange], checkpoints: &[Checkpoint]) -> String {
    let mut out = String::new();

    for change in changes {
        let mut own: Vec<&Checkpoint> = checkpoints
            .iter()
            .filter(|c| c.change_id == change.id)
            .collect();
        if own.is_empty() {
            continue;
        }
        own.sort_by_key(|c| c.horizon);

        let horizons: Vec<String> = own.iter().map(|c| format_horizon(c)).collect();
        let _ = writeln!(
            out,
            "- {} on {} ({}, {}): {}",
            change.element,
            change.page,
            change.scope,
            change.status,
            horizons.join(" | ")
        );
    }

    out
}

fn format_horizon(checkpoint: &Checkpoint) -> String {
    let mut text = checkpoint.horizon.to_string();
    if checkpoint.horizon.is_decision() {
        text.push_str(" [DECISION]");
    }
    let _ = write!(text, " {}", checkpoint.assessment);
    if let Some(top) = top_metric(&checkpoint.metrics) {
        let _ = write!(text, " ({} {:+.1}%)", top.metric, top.change_percent);
    }
    text
}

/// The metric with the largest absolute movement.
fn top_metric(metrics: &[MetricComparison]) -> Option<&MetricComparison> {
    metrics
        .iter()
        .filter(|m| m.change_percent.is_finite())
        .max_by(|a, b| a.change_percent.abs().total_cmp(&b.change_percent.abs()))
}

/// One chip per horizon; horizons without a checkpoint are `Future` placeholders.
#[must_use]
pub fn horizon_chips(checkpoints: &[Checkpoint]) -> Vec<HorizonChip> {
    Horizon::ALL
        .into_iter()
        .map(|horizon| {
            checkpoints.iter().find(|c| c.horizon == horizon).map_or(
                HorizonChip {
                    horizon,
                    state: ChipState::Future,
                    assessment: None,
                    reasoning: None,
                    is_decision: horizon.is_decision(),
                },
                |c| HorizonChip {
                    horizon,
                    state: ChipState::Computed,
                    assessment: Some(c.assessment),
                    reasoning: c.reasoning.clone(),
                    is_decision: horizon.is_decision(),
                },
            )
        })
        .collect()
}
