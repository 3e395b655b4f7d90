use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Evaluate(args) => commands::evaluate::handle(&args, ctx, flags).await,
        Commands::Reconcile(args) => commands::reconcile::handle(&args, ctx, flags).await,
        Commands::Candidates(args) => commands::candidates::handle(&args, ctx, flags).await,
        Commands::Digest(args) => commands::digest::handle(&args, ctx, flags).await,
        Commands::Chips(args) => commands::chips::handle(&args, ctx, flags).await,
        Commands::Snapshot(args) => commands::snapshot::handle(&args, ctx, flags).await,
        Commands::Change { action } => commands::change::handle(&action, ctx, flags).await,
        Commands::Windows(args) => commands::windows::handle(&args, flags),
    }
}
