//! Status transition state machine.
//!
//! `watching` is left exactly once, at the decision horizon. Later horizons
//! may only flip a resolved status when the new verdict is decisive and
//! disagrees with it. `reverted` and `superseded` are reached only through
//! lifecycle events and freeze the status for good.

use vigil_core::entities::{Checkpoint, StatusTransition};
use vigil_core::enums::{Assessment, ChangeStatus, Horizon, LifecycleEvent};

/// Decide the status transition produced by one evaluated horizon.
///
/// `prior` holds the change's checkpoints from earlier evaluations (not the
/// one being evaluated). Returns `None` when the status must not move.
#[must_use]
pub fn resolve_status_transition(
    status: ChangeStatus,
    horizon: Horizon,
    assessment: Assessment,
    prior: &[Checkpoint],
) -> Option<StatusTransition> {
    if status.is_terminal() || horizon.is_early() {
        return None;
    }

    if horizon.is_decision() {
        return resolve_at_decision(status, horizon, assessment, prior);
    }

    resolve_after_decision(status, horizon, assessment)
}

fn resolve_at_decision(
    status: ChangeStatus,
    horizon: Horizon,
    assessment: Assessment,
    prior: &[Checkpoint],
) -> Option<StatusTransition> {
    if status != ChangeStatus::Watching {
        return None;
    }
    // A decision checkpoint already on record means resolution has happened.
    if prior.iter().any(|c| c.horizon == horizon) {
        return None;
    }

    let (new_status, cause) = match assessment {
        Assessment::Improved => (ChangeStatus::Validated, "metrics improved"),
        Assessment::Regressed => (ChangeStatus::Regressed, "metrics regressed"),
        Assessment::Neutral => (ChangeStatus::Inconclusive, "no significant movement"),
        Assessment::Inconclusive => (ChangeStatus::Inconclusive, "insufficient metric data"),
    };
    Some(StatusTransition::new(new_status, format!("{horizon}: {cause}")))
}

fn resolve_after_decision(
    status: ChangeStatus,
    horizon: Horizon,
    assessment: Assessment,
) -> Option<StatusTransition> {
    let (new_status, cause) = match (status, assessment) {
        (ChangeStatus::Validated, Assessment::Regressed) => {
            (ChangeStatus::Regressed, "trend reversed to regression")
        }
        (ChangeStatus::Regressed, Assessment::Improved) => {
            (ChangeStatus::Validated, "trend reversed to improvement")
        }
        (ChangeStatus::Inconclusive, Assessment::Improved) => {
            (ChangeStatus::Validated, "metrics improved")
        }
        (ChangeStatus::Inconclusive, Assessment::Regressed) => {
            (ChangeStatus::Regressed, "metrics regressed")
        }
        _ => return None,
    };
    Some(StatusTransition::new(new_status, format!("{horizon}: {cause}")))
}

/// Transition into a terminal status for a revert or supersede event.
///
/// Terminal changes stay where they are.
#[must_use]
pub fn resolve_lifecycle_transition(
    status: ChangeStatus,
    event: LifecycleEvent,
) -> Option<StatusTransition> {
    let target = event.target_status();
    if !status.can_transition_to(target) {
        return None;
    }

    let cause = match event {
        LifecycleEvent::Reverted => "page content reverted to its previous state",
        LifecycleEvent::Superseded => "replaced by a newer change",
    };
    Some(StatusTransition::new(target, format!("lifecycle: {cause}")))
}

// ---------------------------------------------------------------------------
// Early resolution
// ---------------------------------------------------------------------------

/// Policy for letting D+7 and D+14 resolve a change before the decision horizon.
///
/// Only `Disabled` exists. Enabling early resolution needs a confidence rule
/// that has not been defined; until then early horizons stay signal-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarlyResolutionPolicy {
    #[default]
    Disabled,
}

/// Early-horizon resolution hook. Always `None` under the disabled policy.
#[must_use]
pub fn resolve_early_transition(
    policy: EarlyResolutionPolicy,
    status: ChangeStatus,
    horizon: Horizon,
    assessment: Assessment,
) -> Option<StatusTransition> {
    match policy {
        EarlyResolutionPolicy::Disabled => {
            tracing::trace!(%status, %horizon, %assessment, "early resolution disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use vigil_core::entities::ComparisonWindows;

    const ALL_STATUSES: [ChangeStatus; 6] = [
        ChangeStatus::Watching,
        ChangeStatus::Validated,
        ChangeStatus::Regressed,
        ChangeStatus::Inconclusive,
        ChangeStatus::Reverted,
        ChangeStatus::Superseded,
    ];

    const ALL_ASSESSMENTS: [Assessment; 4] = [
        Assessment::Improved,
        Assessment::Regressed,
        Assessment::Neutral,
        Assessment::Inconclusive,
    ];

    fn checkpoint(horizon: Horizon, assessment: Assessment) -> Checkpoint {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Checkpoint {
            id: format!("ckp-{}", horizon.days()),
            change_id: "chg-00000001".into(),
            horizon,
            windows: ComparisonWindows {
                before_start: t,
                before_end: t,
                after_start: t,
                after_end: t,
            },
            metrics: vec![],
            assessment,
            reasoning: None,
            computed_at: t,
        }
    }

    #[test]
    fn watching_regressed_at_decision_horizon() {
        let transition = resolve_status_transition(
            ChangeStatus::Watching,
            Horizon::D30,
            Assessment::Regressed,
            &[],
        );
        assert_eq!(
            transition,
            Some(StatusTransition::new(
                ChangeStatus::Regressed,
                "D+30: metrics regressed"
            ))
        );
    }

    #[test]
    fn validated_reverses_on_late_regression_only() {
        let prior = [checkpoint(Horizon::D30, Assessment::Improved)];
        assert_eq!(
            resolve_status_transition(
                ChangeStatus::Validated,
                Horizon::D60,
                Assessment::Regressed,
                &prior
            ),
            Some(StatusTransition::new(
                ChangeStatus::Regressed,
                "D+60: trend reversed to regression"
            ))
        );
        assert_eq!(
            resolve_status_transition(
                ChangeStatus::Validated,
                Horizon::D60,
                Assessment::Neutral,
                &prior
            ),
            None
        );
    }

    #[rstest]
    #[case(Assessment::Improved, ChangeStatus::Validated)]
    #[case(Assessment::Regressed, ChangeStatus::Regressed)]
    #[case(Assessment::Neutral, ChangeStatus::Inconclusive)]
    #[case(Assessment::Inconclusive, ChangeStatus::Inconclusive)]
    fn decision_horizon_resolves_watching(
        #[case] assessment: Assessment,
        #[case] expected: ChangeStatus,
    ) {
        let transition =
            resolve_status_transition(ChangeStatus::Watching, Horizon::D30, assessment, &[])
                .expect("decision horizon always resolves watching");
        assert_eq!(transition.new_status, expected);
        assert!(transition.reason.starts_with("D+30: "));
    }

    #[rstest]
    #[case(ChangeStatus::Validated, Assessment::Improved, None)]
    #[case(ChangeStatus::Validated, Assessment::Regressed, Some(ChangeStatus::Regressed))]
    #[case(ChangeStatus::Regressed, Assessment::Improved, Some(ChangeStatus::Validated))]
    #[case(ChangeStatus::Regressed, Assessment::Regressed, None)]
    #[case(ChangeStatus::Regressed, Assessment::Inconclusive, None)]
    #[case(ChangeStatus::Inconclusive, Assessment::Improved, Some(ChangeStatus::Validated))]
    #[case(ChangeStatus::Inconclusive, Assessment::Regressed, Some(ChangeStatus::Regressed))]
    #[case(ChangeStatus::Inconclusive, Assessment::Neutral, None)]
    #[case(ChangeStatus::Watching, Assessment::Improved, None)]
    fn late_horizon_table(
        #[case] status: ChangeStatus,
        #[case] assessment: Assessment,
        #[case] expected: Option<ChangeStatus>,
    ) {
        for horizon in [Horizon::D60, Horizon::D90] {
            let got = resolve_status_transition(status, horizon, assessment, &[])
                .map(|t| t.new_status);
            assert_eq!(got, expected, "{status} + {assessment} at {horizon}");
        }
    }

    #[test]
    fn early_horizons_never_move_status() {
        for status in ALL_STATUSES {
            for assessment in ALL_ASSESSMENTS {
                for horizon in [Horizon::D7, Horizon::D14] {
                    assert_eq!(
                        resolve_status_transition(status, horizon, assessment, &[]),
                        None
                    );
                }
            }
        }
    }

    #[test]
    fn terminal_statuses_are_frozen_at_every_horizon() {
        for status in [ChangeStatus::Reverted, ChangeStatus::Superseded] {
            for horizon in Horizon::ALL {
                for assessment in ALL_ASSESSMENTS {
                    assert_eq!(
                        resolve_status_transition(status, horizon, assessment, &[]),
                        None
                    );
                }
            }
        }
    }

    #[test]
    fn every_produced_transition_is_allowed_by_the_state_table() {
        for status in ALL_STATUSES {
            for horizon in Horizon::ALL {
                for assessment in ALL_ASSESSMENTS {
                    if let Some(t) = resolve_status_transition(status, horizon, assessment, &[]) {
                        assert!(
                            status.can_transition_to(t.new_status),
                            "{status} -> {} is not in the state table",
                            t.new_status
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn same_inputs_same_output() {
        let prior = [
            checkpoint(Horizon::D7, Assessment::Improved),
            checkpoint(Horizon::D14, Assessment::Neutral),
        ];
        let a = resolve_status_transition(
            ChangeStatus::Watching,
            Horizon::D30,
            Assessment::Improved,
            &prior,
        );
        let b = resolve_status_transition(
            ChangeStatus::Watching,
            Horizon::D30,
            Assessment::Improved,
            &prior,
        );
        assert_eq!(a, b);
        assert_eq!(a.map(|t| t.reason), Some("D+30: metrics improved".to_string()));
    }

    #[test]
    fn decision_is_not_repeated_when_already_on_record() {
        let prior = [checkpoint(Horizon::D30, Assessment::Neutral)];
        assert_eq!(
            resolve_status_transition(
                ChangeStatus::Watching,
                Horizon::D30,
                Assessment::Improved,
                &prior
            ),
            None
        );
    }

    #[test]
    fn lifecycle_events_reach_terminal_statuses() {
        let reverted =
            resolve_lifecycle_transition(ChangeStatus::Validated, LifecycleEvent::Reverted)
                .expect("validated can be reverted");
        assert_eq!(reverted.new_status, ChangeStatus::Reverted);
        assert!(reverted.reason.starts_with("lifecycle: "));

        let superseded =
            resolve_lifecycle_transition(ChangeStatus::Watching, LifecycleEvent::Superseded)
                .expect("watching can be superseded");
        assert_eq!(superseded.new_status, ChangeStatus::Superseded);
    }

    #[test]
    fn lifecycle_events_ignore_terminal_statuses() {
        assert_eq!(
            resolve_lifecycle_transition(ChangeStatus::Reverted, LifecycleEvent::Superseded),
            None
        );
        assert_eq!(
            resolve_lifecycle_transition(ChangeStatus::Superseded, LifecycleEvent::Reverted),
            None
        );
    }

    #[test]
    fn early_resolution_stays_disabled() {
        for assessment in ALL_ASSESSMENTS {
            for horizon in [Horizon::D7, Horizon::D14] {
                assert_eq!(
                    resolve_early_transition(
                        EarlyResolutionPolicy::default(),
                        ChangeStatus::Watching,
                        horizon,
                        assessment
                    ),
                    None
                );
            }
        }
    }
}
