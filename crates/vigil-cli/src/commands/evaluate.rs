use anyhow::Context;
use serde_json::json;
use vigil_evidence::AssessmentPolicy;
use vigil_metrics::MetricGatherer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::EvaluateArgs;
use crate::commands::parse::parse_instant;
use crate::context::AppContext;
use crate::output::output;
use crate::pipeline::EvaluationPipeline;

/// Handle `vigil evaluate`.
pub async fn handle(
    args: &EvaluateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let now = parse_instant(args.now.as_deref(), "now")?;
    let gatherer = MetricGatherer::from_config(&ctx.config, ctx.service.db())
        .context("failed to build metric sources")?;
    let sources = gatherer.source_names();
    let policy = AssessmentPolicy::new(ctx.config.evidence.lower_is_better.iter());
    let pipeline = EvaluationPipeline::new(&ctx.service, gatherer, policy);

    let reports = match &args.change {
        Some(id) => {
            let change = ctx
                .service
                .db()
                .get_change(id)
                .await
                .with_context(|| format!("change '{id}' not found"))?;
            pipeline.evaluate_change(change, now).await?
        }
        None => pipeline.evaluate_all(now).await?,
    };

    let transitions = reports.iter().filter(|r| r.transition.is_some()).count();
    output(
        &json!({
            "project": ctx.project_root.display().to_string(),
            "evaluated_at": now,
            "sources": sources,
            "checkpoints": reports,
            "transitions": transitions,
        }),
        flags.format,
    )
}
