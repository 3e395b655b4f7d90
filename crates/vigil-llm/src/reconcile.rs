//! Reconciliation of LLM-observed changes against tracked changes.
//!
//! Every observed change ends up in exactly one bucket. A link that passes
//! the gate updates the tracked change, or reverts it when the page went back
//! to the tracked change's before-content. Anything else becomes a fresh
//! `watching` change.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vigil_core::commands::EngineCommand;
use vigil_core::entities::{DetectedChange, MatchCandidate, MatchDecision};
use vigil_core::enums::{ChangeStatus, LifecycleEvent};
use vigil_evidence::resolve_lifecycle_transition;

use crate::error::LlmError;
use crate::gate::{ObservedSide, validate_match};
use crate::response::ObservedChange;

/// The `max` most recently detected `watching` changes, newest first.
///
/// This is the exact set to show the LLM and later to gate against.
#[must_use]
pub fn candidate_window(changes: &[DetectedChange], max: usize) -> Vec<MatchCandidate> {
    let mut watching: Vec<&DetectedChange> = changes
        .iter()
        .filter(|c| c.status == ChangeStatus::Watching)
        .collect();
    watching.sort_by(|a, b| b.first_detected_at.cmp(&a.first_detected_at));
    watching.into_iter().take(max).map(MatchCandidate::from).collect()
}

/// Where the reconciled observation was made.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileContext<'a> {
    pub page: &'a str,
    pub seen_at: DateTime<Utc>,
}

/// What happened to one observed change.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Linked {
        element: String,
        change_id: String,
        decision: MatchDecision,
    },
    Reverted {
        element: String,
        change_id: String,
        decision: MatchDecision,
    },
    Fresh {
        element: String,
        change_id: String,
        /// The rejected proposal, when the LLM made one.
        decision: Option<MatchDecision>,
    },
}

/// Outcomes plus the commands that carry them out, in order.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub outcomes: Vec<ReconcileOutcome>,
    pub commands: Vec<EngineCommand>,
}

/// Reconcile one audit's observed changes.
///
/// `presented` is the candidate window the LLM saw, `tracked` the full
/// changes behind it, and `fresh_ids` one pre-generated ID per observed
/// change (unused IDs are discarded).
///
/// # Errors
///
/// Returns [`LlmError::MissingIds`] if fewer IDs than observed changes are supplied.
pub fn reconcile(
    observed: &[ObservedChange],
    fresh_ids: &[String],
    presented: &[MatchCandidate],
    tracked: &[DetectedChange],
    ctx: ReconcileContext<'_>,
) -> Result<Reconciliation, LlmError> {
    if fresh_ids.len() < observed.len() {
        return Err(LlmError::MissingIds {
            needed: observed.len(),
            got: fresh_ids.len(),
        });
    }

    let mut result = Reconciliation::default();
    for (change, fresh_id) in observed.iter().zip(fresh_ids) {
        let decision = change.proposal().map(|proposal| {
            validate_match(
                &proposal,
                presented,
                ObservedSide {
                    scope: change.scope,
                    element: &change.element,
                },
            )
        });

        let target = decision
            .as_ref()
            .filter(|d| d.accepted)
            .and_then(|d| tracked.iter().find(|t| t.id == d.target_id));

        match (target, decision) {
            (Some(target), Some(decision)) => {
                link(&mut result, change, target, decision, ctx);
            }
            (_, decision) => {
                insert_fresh(&mut result, change, fresh_id, decision, ctx);
            }
        }
    }
    Ok(result)
}

fn link(
    result: &mut Reconciliation,
    observed: &ObservedChange,
    target: &DetectedChange,
    decision: MatchDecision,
    ctx: ReconcileContext<'_>,
) {
    result.commands.push(EngineCommand::UpdateObservation {
        change_id: target.id.clone(),
        after: observed.after.clone(),
        seen_at: ctx.seen_at,
    });

    let reverted = observed.after.trim() == target.before.trim();
    if reverted {
        if let Some(transition) =
            resolve_lifecycle_transition(target.status, LifecycleEvent::Reverted)
        {
            result.commands.push(EngineCommand::ApplyTransition {
                change_id: target.id.clone(),
                from: target.status,
                transition,
            });
        }
        result.outcomes.push(ReconcileOutcome::Reverted {
            element: observed.element.clone(),
            change_id: target.id.clone(),
            decision,
        });
    } else {
        result.outcomes.push(ReconcileOutcome::Linked {
            element: observed.element.clone(),
            change_id: target.id.clone(),
            decision,
        });
    }
}

fn insert_fresh(
    result: &mut Reconciliation,
    observed: &ObservedChange,
    id: &str,
    decision: Option<MatchDecision>,
    ctx: ReconcileContext<'_>,
) {
    result.commands.push(EngineCommand::InsertChange {
        change: DetectedChange {
            id: id.to_owned(),
            page: ctx.page.to_owned(),
            element: observed.element.clone(),
            scope: observed.scope,
            before: observed.before.clone(),
            after: observed.after.clone(),
            description: observed.description.clone(),
            status: ChangeStatus::Watching,
            first_detected_at: ctx.seen_at,
            last_seen_at: ctx.seen_at,
            updated_at: ctx.seen_at,
        },
    });
    result.outcomes.push(ReconcileOutcome::Fresh {
        element: observed.element.clone(),
        change_id: id.to_owned(),
        decision,
    });
}
