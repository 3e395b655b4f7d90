//! Evaluation pipeline: schedule → windows → gather → plan → apply.
//!
//! For each tracked change:
//! 1. Find the horizons that are due (`vigil-evidence::due_horizons`)
//! 2. Compute the comparison windows for each due horizon
//! 3. Gather metric deltas from every configured source (`vigil-metrics`)
//! 4. Plan the checkpoint and any status transition (`vigil-evidence::plan_checkpoint`)
//! 5. Apply the commands in one transaction per `(change, horizon)` (`vigil-db`)
//!
//! Horizons of one change run in order so each sees the status the previous
//! one left behind.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use vigil_core::commands::{CommandRecord, EngineCommand};
use vigil_core::entities::{DetectedChange, StatusTransition};
use vigil_core::enums::{Assessment, Horizon};
use vigil_core::ids::PREFIX_CHECKPOINT;
use vigil_db::service::VigilService;
use vigil_evidence::plan::CheckpointInput;
use vigil_evidence::{AssessmentPolicy, compute_windows, due_horizons, plan_checkpoint};
use vigil_metrics::MetricGatherer;

/// Outcome of one evaluated horizon.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HorizonReport {
    pub change_id: String,
    pub horizon: Horizon,
    pub assessment: Assessment,
    pub metric_count: usize,
    /// `false` when another run recorded this horizon first.
    pub checkpoint_recorded: bool,
    /// The status transition that took effect, if any.
    pub transition: Option<StatusTransition>,
}

impl HorizonReport {
    fn from_records(change_id: &str, horizon: Horizon, records: &[CommandRecord]) -> Option<Self> {
        let mut report = None;
        for record in records {
            match &record.command {
                EngineCommand::AppendCheckpoint { checkpoint } => {
                    report = Some(Self {
                        change_id: change_id.to_string(),
                        horizon,
                        assessment: checkpoint.assessment,
                        metric_count: checkpoint.metrics.len(),
                        checkpoint_recorded: record.applied,
                        transition: None,
                    });
                }
                EngineCommand::ApplyTransition { transition, .. } if record.applied => {
                    if let Some(report) = report.as_mut() {
                        report.transition = Some(transition.clone());
                    }
                }
                _ => {}
            }
        }
        report
    }
}

/// Runs due checkpoints against the configured metric sources.
pub struct EvaluationPipeline<'a> {
    service: &'a VigilService,
    gatherer: MetricGatherer<'a>,
    policy: AssessmentPolicy,
}

impl<'a> EvaluationPipeline<'a> {
    pub const fn new(
        service: &'a VigilService,
        gatherer: MetricGatherer<'a>,
        policy: AssessmentPolicy,
    ) -> Self {
        Self {
            service,
            gatherer,
            policy,
        }
    }

    /// Evaluate every tracked change, terminal ones included: they keep
    /// collecting checkpoints even though their status is frozen.
    pub async fn evaluate_all(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<HorizonReport>> {
        let changes = self
            .service
            .db()
            .list_changes()
            .await
            .context("failed to list tracked changes")?;

        let mut reports = Vec::new();
        for change in changes {
            let id = change.id.clone();
            reports.extend(
                self.evaluate_change(change, now)
                    .await
                    .with_context(|| format!("failed to evaluate change {id}"))?,
            );
        }
        Ok(reports)
    }

    /// Evaluate the due horizons of one change, oldest first.
    pub async fn evaluate_change(
        &self,
        mut change: DetectedChange,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<HorizonReport>> {
        let db = self.service.db();
        let evaluated = db.evaluated_horizons(&change.id).await?;
        let due = due_horizons(change.first_detected_at, now, &evaluated);
        if due.is_empty() {
            tracing::debug!(change_id = %change.id, "no horizon due");
            return Ok(Vec::new());
        }

        let mut reports = Vec::with_capacity(due.len());
        for horizon in due {
            let windows = compute_windows(change.first_detected_at, horizon);
            let deltas = self.gatherer.gather(&change.page, &windows).await;
            let prior = db.list_checkpoints(&change.id).await?;
            let checkpoint_id = db.generate_id(PREFIX_CHECKPOINT).await?;

            let commands = plan_checkpoint(
                CheckpointInput {
                    change: &change,
                    horizon,
                    deltas: &deltas,
                    prior: &prior,
                    checkpoint_id,
                    computed_at: Utc::now(),
                },
                &self.policy,
            );
            let records = self.service.apply_commands(commands).await?;

            let Some(report) = HorizonReport::from_records(&change.id, horizon, &records) else {
                continue;
            };
            if let Some(transition) = &report.transition {
                change.status = transition.new_status;
            }
            tracing::info!(
                change_id = %change.id,
                %horizon,
                assessment = %report.assessment,
                recorded = report.checkpoint_recorded,
                "horizon evaluated"
            );
            reports.push(report);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use vigil_core::enums::{ChangeScope, ChangeStatus};
    use vigil_metrics::{DatabaseAdapter, MetricSource};

    use super::*;

    fn detected_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn change() -> DetectedChange {
        DetectedChange {
            id: "chg-00000001".into(),
            page: "/pricing".into(),
            element: "Hero CTA".into(),
            scope: ChangeScope::Element,
            before: "Buy".into(),
            after: "Start free trial".into(),
            description: None,
            status: ChangeStatus::Watching,
            first_detected_at: detected_at(),
            last_seen_at: detected_at(),
            updated_at: detected_at(),
        }
    }

    async fn service_with_change() -> VigilService {
        let service = VigilService::new_local(":memory:", None).await.unwrap();
        service
            .apply_commands(vec![EngineCommand::InsertChange { change: change() }])
            .await
            .unwrap();
        service
    }

    /// Signups grow by 10 a day before detection and 20 a day after.
    async fn seed_signups(service: &VigilService) {
        for day in -40_i64..=40 {
            let count = if day <= 0 { 1000 + 10 * day } else { 1000 + 20 * day };
            service
                .db()
                .record_row_count("signups", count, detected_at() + Duration::days(day))
                .await
                .unwrap();
        }
    }

    fn signups_gatherer(service: &VigilService) -> MetricGatherer<'_> {
        MetricGatherer::new(
            vec![MetricSource::Database(DatabaseAdapter::new(
                service.db(),
                vec!["signups".into()],
            ))],
            StdDuration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn due_horizons_run_in_order_and_validate_at_decision() {
        let service = service_with_change().await;
        seed_signups(&service).await;
        let pipeline = EvaluationPipeline::new(
            &service,
            signups_gatherer(&service),
            AssessmentPolicy::default(),
        );

        let reports = pipeline
            .evaluate_all(detected_at() + Duration::days(31))
            .await
            .unwrap();

        let horizons: Vec<Horizon> = reports.iter().map(|r| r.horizon).collect();
        assert_eq!(horizons, vec![Horizon::D7, Horizon::D14, Horizon::D30]);
        assert!(reports.iter().all(|r| r.assessment == Assessment::Improved));
        assert!(reports[0].transition.is_none());
        assert!(reports[1].transition.is_none());
        assert_eq!(
            reports[2].transition,
            Some(StatusTransition::new(
                ChangeStatus::Validated,
                "D+30: metrics improved"
            ))
        );

        let stored = service.db().get_change("chg-00000001").await.unwrap();
        assert_eq!(stored.status, ChangeStatus::Validated);
    }

    #[tokio::test]
    async fn rerun_at_the_same_instant_is_a_no_op() {
        let service = service_with_change().await;
        seed_signups(&service).await;
        let pipeline = EvaluationPipeline::new(
            &service,
            signups_gatherer(&service),
            AssessmentPolicy::default(),
        );
        let now = detected_at() + Duration::days(15);

        assert_eq!(pipeline.evaluate_all(now).await.unwrap().len(), 2);
        assert!(pipeline.evaluate_all(now).await.unwrap().is_empty());
        assert_eq!(
            service.db().evaluated_horizons("chg-00000001").await.unwrap(),
            vec![Horizon::D7, Horizon::D14]
        );
    }

    #[tokio::test]
    async fn no_sources_resolve_as_inconclusive() {
        let service = service_with_change().await;
        let pipeline = EvaluationPipeline::new(
            &service,
            MetricGatherer::new(Vec::new(), StdDuration::from_secs(1)),
            AssessmentPolicy::default(),
        );

        let reports = pipeline
            .evaluate_all(detected_at() + Duration::days(30))
            .await
            .unwrap();

        let last = reports.last().unwrap();
        assert_eq!(last.horizon, Horizon::D30);
        assert_eq!(last.metric_count, 0);
        assert_eq!(
            last.transition.as_ref().map(|t| t.new_status),
            Some(ChangeStatus::Inconclusive)
        );
    }

    #[tokio::test]
    async fn terminal_change_keeps_collecting_checkpoints() {
        let service = service_with_change().await;
        service
            .apply_commands(vec![EngineCommand::ApplyTransition {
                change_id: "chg-00000001".into(),
                from: ChangeStatus::Watching,
                transition: StatusTransition::new(
                    ChangeStatus::Reverted,
                    "lifecycle: page content reverted to its previous state",
                ),
            }])
            .await
            .unwrap();
        seed_signups(&service).await;
        let pipeline = EvaluationPipeline::new(
            &service,
            signups_gatherer(&service),
            AssessmentPolicy::default(),
        );

        let reports = pipeline
            .evaluate_all(detected_at() + Duration::days(31))
            .await
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.checkpoint_recorded && r.transition.is_none()));
        let stored = service.db().get_change("chg-00000001").await.unwrap();
        assert_eq!(stored.status, ChangeStatus::Reverted);
    }
}
