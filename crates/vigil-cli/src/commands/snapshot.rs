use crate::cli::GlobalFlags;
use crate::cli::root_commands::SnapshotArgs;
use crate::commands::parse::parse_instant;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vigil snapshot`.
pub async fn handle(
    args: &SnapshotArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if !ctx.config.database.tracked_tables.contains(&args.table) {
        tracing::warn!(
            table = %args.table,
            "table is not in database.tracked_tables; the snapshot will not feed any checkpoint"
        );
    }

    let captured_at = parse_instant(args.at.as_deref(), "at")?;
    let snapshot = ctx
        .service
        .db()
        .record_row_count(&args.table, args.count, captured_at)
        .await?;
    output(&snapshot, flags.format)
}
