use clap::Subcommand;

/// Detected change commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChangeCommands {
    /// Track a change observed outside an LLM audit.
    Add {
        #[arg(long)]
        page: String,
        #[arg(long)]
        element: String,
        /// page, section or element
        #[arg(long)]
        scope: String,
        #[arg(long, default_value = "")]
        before: String,
        #[arg(long)]
        after: String,
        #[arg(long)]
        description: Option<String>,
        /// Detection instant (RFC 3339); defaults to now.
        #[arg(long)]
        detected_at: Option<String>,
    },
    /// Get a change with its checkpoints.
    Get { id: String },
    /// List changes, optionally filtered by status.
    List {
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark a change as reverted.
    Revert { id: String },
    /// Mark a change as superseded by a newer one.
    Supersede { id: String },
}
