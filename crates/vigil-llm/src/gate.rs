//! Match validation gate for LLM-proposed links.
//!
//! Gates run in a fixed order and the first failure wins:
//! candidate set, then confidence, then scope compatibility.

use vigil_core::entities::{MatchCandidate, MatchDecision, MatchProposal};
use vigil_core::enums::{ChangeScope, MatchGate};

/// Minimum confidence for a proposed link to be trusted.
pub const MATCH_CONFIDENCE_THRESHOLD: f64 = 0.70;

/// The new change a proposal is about.
#[derive(Debug, Clone, Copy)]
pub struct ObservedSide<'a> {
    pub scope: ChangeScope,
    pub element: &'a str,
}

/// Run a proposal through every gate.
///
/// `candidates` must be exactly the set shown to the LLM in the call that
/// produced the proposal.
#[must_use]
pub fn validate_match(
    proposal: &MatchProposal,
    candidates: &[MatchCandidate],
    observed: ObservedSide<'_>,
) -> MatchDecision {
    let decision = match check_gates(proposal, candidates, observed) {
        Ok(()) => accept(proposal),
        Err((gate, reason)) => reject(proposal, gate, reason),
    };

    if !decision.accepted {
        tracing::debug!(
            target_id = %decision.target_id,
            confidence = decision.confidence,
            gate = decision.failed_gate.map(MatchGate::as_str),
            reason = decision.rejection_reason.as_deref(),
            "match proposal rejected"
        );
    }
    decision
}

fn check_gates(
    proposal: &MatchProposal,
    candidates: &[MatchCandidate],
    observed: ObservedSide<'_>,
) -> Result<(), (MatchGate, String)> {
    let Some(candidate) = candidates.iter().find(|c| c.id == proposal.target_id) else {
        return Err((
            MatchGate::CandidateSet,
            format!(
                "target '{}' is not one of the {} candidates offered",
                proposal.target_id,
                candidates.len()
            ),
        ));
    };

    if !(0.0..=1.0).contains(&proposal.confidence) {
        return Err((
            MatchGate::Confidence,
            format!(
                "confidence {} is outside [0, 1]",
                proposal.confidence
            ),
        ));
    }
    if proposal.confidence < MATCH_CONFIDENCE_THRESHOLD {
        return Err((
            MatchGate::Confidence,
            format!(
                "confidence {:.2} is below the {MATCH_CONFIDENCE_THRESHOLD:.2} threshold",
                proposal.confidence
            ),
        ));
    }

    scope_compatibility(observed, candidate)
        .map_err(|reason| (MatchGate::ScopeCompatibility, reason))
}

/// Compatibility matrix between the new change and a candidate.
///
/// Page scope matches anything and section matches element. Equal scopes
/// must name the same element or section.
///
/// # Errors
///
/// Returns the rejection reason when the pair is incompatible.
pub fn scope_compatibility(
    observed: ObservedSide<'_>,
    candidate: &MatchCandidate,
) -> Result<(), String> {
    use ChangeScope::{Element, Page, Section};

    match (observed.scope, candidate.scope) {
        (Page, _) | (_, Page) | (Section, Element) | (Element, Section) => Ok(()),
        (Element, Element) | (Section, Section) => {
            if normalize_label(observed.element) == normalize_label(&candidate.element) {
                Ok(())
            } else {
                Err(format!(
                    "{} '{}' and {} '{}' are different {}s",
                    observed.scope,
                    observed.element,
                    candidate.scope,
                    candidate.element,
                    candidate.scope
                ))
            }
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn accept(proposal: &MatchProposal) -> MatchDecision {
    MatchDecision {
        accepted: true,
        target_id: proposal.target_id.clone(),
        confidence: proposal.confidence,
        rationale: proposal.rationale.clone(),
        failed_gate: None,
        rejection_reason: None,
    }
}

fn reject(proposal: &MatchProposal, gate: MatchGate, reason: String) -> MatchDecision {
    MatchDecision {
        accepted: false,
        target_id: proposal.target_id.clone(),
        confidence: proposal.confidence,
        rationale: proposal.rationale.clone(),
        failed_gate: Some(gate),
        rejection_reason: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn candidate(id: &str, scope: ChangeScope, element: &str) -> MatchCandidate {
        MatchCandidate {
            id: id.into(),
            element: element.into(),
            scope,
            after: "Start free trial".into(),
        }
    }

    fn proposal(target_id: &str, confidence: f64) -> MatchProposal {
        MatchProposal {
            target_id: target_id.into(),
            confidence,
            rationale: "same CTA slot".into(),
        }
    }

    fn hero() -> ObservedSide<'static> {
        ObservedSide {
            scope: ChangeScope::Element,
            element: "Hero CTA",
        }
    }

    #[test]
    fn accepts_when_every_gate_passes() {
        let candidates = [candidate("chg-1", ChangeScope::Element, "hero  cta")];
        let decision = validate_match(&proposal("chg-1", 0.9), &candidates, hero());
        assert!(decision.accepted);
        assert_eq!(decision.failed_gate, None);
        assert_eq!(decision.rejection_reason, None);
    }

    #[test]
    fn low_confidence_mentions_threshold() {
        let candidates = [candidate("chg-1", ChangeScope::Element, "Hero CTA")];
        let decision = validate_match(&proposal("chg-1", 0.65), &candidates, hero());

        assert!(!decision.accepted);
        assert_eq!(decision.failed_gate, Some(MatchGate::Confidence));
        let reason = decision.rejection_reason.expect("reason");
        assert!(reason.contains("0.70"), "{reason}");
        assert_eq!(decision.confidence, 0.65);
        assert_eq!(decision.rationale, "same CTA slot");
    }

    #[test]
    fn exact_threshold_passes() {
        let candidates = [candidate("chg-1", ChangeScope::Element, "Hero CTA")];
        assert!(validate_match(&proposal("chg-1", 0.70), &candidates, hero()).accepted);
    }

    #[test]
    fn unknown_target_fails_before_confidence() {
        let candidates = [candidate("chg-1", ChangeScope::Element, "Hero CTA")];
        let decision = validate_match(&proposal("chg-hallucinated", 0.1), &candidates, hero());
        assert_eq!(decision.failed_gate, Some(MatchGate::CandidateSet));
        assert_eq!(decision.confidence, 0.1);
    }

    #[test]
    fn empty_candidate_set_rejects_everything() {
        let decision = validate_match(&proposal("chg-1", 0.99), &[], hero());
        assert_eq!(decision.failed_gate, Some(MatchGate::CandidateSet));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(1.5)]
    #[case(-0.2)]
    fn out_of_range_confidence_is_rejected(#[case] confidence: f64) {
        let candidates = [candidate("chg-1", ChangeScope::Element, "Hero CTA")];
        let decision = validate_match(&proposal("chg-1", confidence), &candidates, hero());
        assert_eq!(decision.failed_gate, Some(MatchGate::Confidence));
    }

    #[rstest]
    #[case(ChangeScope::Page, "Whole page", ChangeScope::Element, "Hero CTA", true)]
    #[case(ChangeScope::Element, "Hero CTA", ChangeScope::Page, "Pricing page", true)]
    #[case(ChangeScope::Section, "Hero", ChangeScope::Element, "Hero CTA", true)]
    #[case(ChangeScope::Element, "Hero CTA", ChangeScope::Section, "Hero", true)]
    #[case(ChangeScope::Element, "Hero CTA", ChangeScope::Element, "hero cta", true)]
    #[case(ChangeScope::Element, "Hero CTA", ChangeScope::Element, "Footer link", false)]
    #[case(ChangeScope::Section, "Hero", ChangeScope::Section, "Hero", true)]
    #[case(ChangeScope::Section, "Hero", ChangeScope::Section, "Testimonials", false)]
    fn scope_matrix(
        #[case] new_scope: ChangeScope,
        #[case] new_element: &str,
        #[case] candidate_scope: ChangeScope,
        #[case] candidate_element: &str,
        #[case] compatible: bool,
    ) {
        let observed = ObservedSide {
            scope: new_scope,
            element: new_element,
        };
        let result = scope_compatibility(
            observed,
            &candidate("chg-1", candidate_scope, candidate_element),
        );
        assert_eq!(result.is_ok(), compatible);
    }

    #[test]
    fn scope_mismatch_reports_gate_and_reason() {
        let candidates = [candidate("chg-1", ChangeScope::Element, "Footer link")];
        let decision = validate_match(&proposal("chg-1", 0.95), &candidates, hero());
        assert!(!decision.accepted);
        assert_eq!(decision.failed_gate, Some(MatchGate::ScopeCompatibility));
        assert_eq!(
            decision.rejection_reason.as_deref(),
            Some("element 'Hero CTA' and element 'Footer link' are different elements")
        );
    }
}
