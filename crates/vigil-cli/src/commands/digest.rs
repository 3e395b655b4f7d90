use vigil_evidence::format_checkpoint_digest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DigestArgs;
use crate::context::AppContext;
use crate::output::output_text;

/// Handle `vigil digest`.
pub async fn handle(
    args: &DigestArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.evidence.digest_history_limit);
    let db = ctx.service.db();

    let mut changes = db.list_changes().await?;
    changes.truncate(limit);

    let mut checkpoints = Vec::new();
    for change in &changes {
        checkpoints.extend(db.list_checkpoints(&change.id).await?);
    }

    let digest = format_checkpoint_digest(&changes, &checkpoints);
    output_text("digest", &digest, flags.format)
}
