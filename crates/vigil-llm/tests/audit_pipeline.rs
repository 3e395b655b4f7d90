//! Raw LLM text through parsing, gating and reconciliation.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use vigil_core::enums::{ChangeScope, ChangeStatus};
use vigil_core::entities::DetectedChange;
use vigil_llm::{
    ReconcileContext, ReconcileOutcome, candidate_window, parse_audit_response, reconcile,
};

fn watching(id: &str, element: &str, scope: ChangeScope) -> DetectedChange {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    DetectedChange {
        id: id.into(),
        page: "/pricing".into(),
        element: element.into(),
        scope,
        before: "Simple pricing".into(),
        after: "Pricing that scales".into(),
        description: None,
        status: ChangeStatus::Watching,
        first_detected_at: t,
        last_seen_at: t,
        updated_at: t,
    }
}

#[test]
fn truncated_fenced_audit_is_reconciled() {
    let tracked = vec![
        watching("chg-hero", "Hero", ChangeScope::Section),
        watching("chg-plan", "Plan table", ChangeScope::Section),
    ];
    let presented = candidate_window(&tracked, 20);

    // Cut off by the output limit in the middle of the second entry's rationale.
    let raw = r#"I compared both screenshots.

```json
{"changes": [
  {"element": "Hero headline", "scope": "element", "before": "Pricing that scales",
   "after": "Pricing for teams", "matched_change_id": "chg-hero", "match_confidence": 0.86,
   "match_rationale": "headline inside the hero section"},
  {"element": "Plan table", "scope": "section", "before": "", "after": "Three tiers",
   "matched_change_id": "chg-plan", "match_confidence": 0.4, "match_rationale": "maybe the sa"#;

    let response = parse_audit_response(raw).expect("repair recovers both entries");
    assert_eq!(response.changes.len(), 2);
    assert_eq!(response.changes[1].match_rationale.as_deref(), Some("maybe the sa"));

    let ids = vec!["chg-f1".to_string(), "chg-f2".to_string()];
    let ctx = ReconcileContext {
        page: "/pricing",
        seen_at: Utc.with_ymd_and_hms(2024, 5, 9, 8, 0, 0).unwrap(),
    };
    let result = reconcile(&response.changes, &ids, &presented, &tracked, ctx).expect("reconciles");

    assert!(matches!(
        &result.outcomes[0],
        ReconcileOutcome::Linked { change_id, .. } if change_id == "chg-hero"
    ));
    assert!(matches!(
        &result.outcomes[1],
        ReconcileOutcome::Fresh { change_id, decision: Some(d), .. }
            if change_id == "chg-f2" && !d.accepted
    ));

    let json = serde_json::to_value(&result.outcomes[0]).expect("serializes");
    assert_eq!(json["outcome"], "linked");
}
