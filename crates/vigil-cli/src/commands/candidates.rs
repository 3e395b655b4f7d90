use serde_json::json;
use vigil_llm::candidate_window;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CandidatesArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vigil candidates`.
pub async fn handle(
    args: &CandidatesArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.evidence.max_match_candidates);
    let changes = ctx.service.db().list_changes().await?;
    let candidates = candidate_window(&changes, limit);

    output(
        &json!({
            "limit": limit,
            "candidates": candidates,
        }),
        flags.format,
    )
}
