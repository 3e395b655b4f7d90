//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::{TimeZone, Utc};
use schemars::schema_for;
use vigil_core::commands::{CommandRecord, EngineCommand};
use vigil_core::entities::*;
use vigil_core::enums::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn fixture_windows() -> ComparisonWindows {
    ComparisonWindows {
        before_start: Utc.with_ymd_and_hms(2023, 12, 2, 0, 0, 0).unwrap(),
        before_end: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        after_start: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        after_end: Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
    }
}

fn fixture_change() -> DetectedChange {
    DetectedChange {
        id: "chg-a3f8b2c1".into(),
        page: "/pricing".into(),
        element: "Hero headline".into(),
        scope: ChangeScope::Element,
        before: "Simple pricing".into(),
        after: "Pricing that scales with you".into(),
        description: Some("Headline rewritten to emphasise scaling".into()),
        status: ChangeStatus::Watching,
        first_detected_at: Utc::now(),
        last_seen_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn fixture_checkpoint() -> Checkpoint {
    Checkpoint {
        id: "ckp-0b1c2d3e".into(),
        change_id: "chg-a3f8b2c1".into(),
        horizon: Horizon::D30,
        windows: fixture_windows(),
        metrics: vec![
            MetricComparison {
                metric: "bounce_rate".into(),
                before: 50.0,
                after: 46.0,
                change_percent: -8.0,
                assessment: MetricAssessment::Improved,
            },
            MetricComparison {
                metric: "pageviews".into(),
                before: 1000.0,
                after: 1020.0,
                change_percent: 2.0,
                assessment: MetricAssessment::Neutral,
            },
        ],
        assessment: Assessment::Improved,
        reasoning: None,
        computed_at: Utc::now(),
    }
}

roundtrip_and_validate!(detected_change_roundtrip, DetectedChange, fixture_change());

roundtrip_and_validate!(checkpoint_roundtrip, Checkpoint, fixture_checkpoint());

roundtrip_and_validate!(
    metric_delta_roundtrip,
    MetricDelta,
    MetricDelta::from_values("unique_visitors", 400.0, 500.0)
);

roundtrip_and_validate!(
    status_transition_roundtrip,
    StatusTransition,
    StatusTransition::new(ChangeStatus::Validated, "D+30: metrics improved")
);

roundtrip_and_validate!(
    match_candidate_roundtrip,
    MatchCandidate,
    MatchCandidate::from(&fixture_change())
);

roundtrip_and_validate!(
    match_decision_roundtrip,
    MatchDecision,
    MatchDecision {
        accepted: false,
        target_id: "chg-a3f8b2c1".into(),
        confidence: 0.65,
        rationale: "Same headline slot".into(),
        failed_gate: Some(MatchGate::Confidence),
        rejection_reason: Some("confidence 0.65 is below the 0.70 threshold".into()),
    }
);

roundtrip_and_validate!(
    horizon_chip_roundtrip,
    HorizonChip,
    HorizonChip {
        horizon: Horizon::D60,
        state: ChipState::Future,
        assessment: None,
        reasoning: None,
        is_decision: false,
    }
);

roundtrip_and_validate!(
    row_count_snapshot_roundtrip,
    RowCountSnapshot,
    RowCountSnapshot {
        id: "snp-11223344".into(),
        table_name: "signups".into(),
        row_count: 1234,
        captured_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    command_record_roundtrip,
    CommandRecord,
    CommandRecord {
        v: 1,
        ts: "2026-02-08T12:00:00Z".into(),
        applied: true,
        command: EngineCommand::AppendCheckpoint {
            checkpoint: fixture_checkpoint(),
        },
    }
);

// --- Schema rejection tests ---

#[test]
fn schema_rejects_change_without_scope() {
    let schema = serde_json::to_value(schema_for!(DetectedChange)).unwrap();
    let invalid = serde_json::json!({
        "id": "chg-test",
        "page": "/",
        "element": "CTA",
        "before": "Buy",
        "after": "Buy now",
        "status": "watching",
        "first_detected_at": "2026-02-08T12:00:00Z",
        "last_seen_at": "2026-02-08T12:00:00Z",
        "updated_at": "2026-02-08T12:00:00Z"
    });
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject change without 'scope'");
}

#[test]
fn schema_rejects_invalid_status_value() {
    let schema = serde_json::to_value(schema_for!(DetectedChange)).unwrap();
    let mut value = serde_json::to_value(fixture_change()).unwrap();
    value["status"] = serde_json::json!("approved");
    let errors = validate_against_schema(&schema, &value);
    assert!(!errors.is_empty(), "Should reject unknown status value");
}

#[test]
fn checkpoint_rejects_unknown_horizon_on_deserialize() {
    let mut value = serde_json::to_value(fixture_checkpoint()).unwrap();
    value["horizon"] = serde_json::json!(45);
    assert!(serde_json::from_value::<Checkpoint>(value).is_err());
}
