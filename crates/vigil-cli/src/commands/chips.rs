use anyhow::Context;
use serde_json::json;
use vigil_evidence::horizon_chips;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ChipsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vigil chips`.
pub async fn handle(args: &ChipsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = ctx.service.db();
    let change = db
        .get_change(&args.change_id)
        .await
        .with_context(|| format!("change '{}' not found", args.change_id))?;
    let checkpoints = db.list_checkpoints(&change.id).await?;

    output(
        &json!({
            "change_id": change.id,
            "status": change.status,
            "chips": horizon_chips(&checkpoints),
        }),
        flags.format,
    )
}
