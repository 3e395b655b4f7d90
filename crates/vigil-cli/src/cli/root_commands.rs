use clap::{Args, Subcommand};

use crate::cli::subcommands::ChangeCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Evaluate every due horizon of every tracked change.
    Evaluate(EvaluateArgs),
    /// Reconcile an LLM page audit against tracked changes.
    Reconcile(ReconcileArgs),
    /// List the watching changes offered to the LLM as match candidates.
    Candidates(CandidatesArgs),
    /// Render the checkpoint history digest for prompt context.
    Digest(DigestArgs),
    /// Show the horizon timeline of one change.
    Chips(ChipsArgs),
    /// Compute the comparison windows for a detection time and horizon.
    Windows(WindowsArgs),
    /// Record a row-count snapshot of a tracked table.
    Snapshot(SnapshotArgs),
    /// Manage detected changes.
    Change {
        #[command(subcommand)]
        action: ChangeCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct EvaluateArgs {
    /// Evaluate as of this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub now: Option<String>,
    /// Only evaluate this change.
    #[arg(long)]
    pub change: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ReconcileArgs {
    /// File holding the raw LLM response, or `-` for stdin.
    pub input: String,
    /// Page the audit was run on.
    #[arg(long)]
    pub page: String,
    /// Output of `vigil candidates` that was shown to the LLM, or `-` for stdin.
    ///
    /// Without it the candidate window is rebuilt from current state.
    #[arg(long)]
    pub candidates: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CandidatesArgs {
    /// Override the configured candidate limit.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct DigestArgs {
    /// Override the configured number of changes in the digest.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct ChipsArgs {
    pub change_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct WindowsArgs {
    /// Detection instant (RFC 3339).
    #[arg(long)]
    pub detected_at: String,
    /// Horizon in days: 7, 14, 30, 60 or 90.
    #[arg(long)]
    pub horizon: u32,
}

#[derive(Clone, Debug, Args)]
pub struct SnapshotArgs {
    #[arg(long)]
    pub table: String,
    #[arg(long)]
    pub count: i64,
    /// Capture instant (RFC 3339); defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}
