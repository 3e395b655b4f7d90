//! Engine commands and their JSONL trail envelope.
//!
//! The pure engine never touches storage. It returns `EngineCommand`s that
//! the imperative shell executes against the persistence layer. Every executed
//! command is also appended to `.vigil/trail/{yyyy-mm-dd}.jsonl` as a
//! `CommandRecord`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Checkpoint, DetectedChange, StatusTransition};
use crate::enums::ChangeStatus;

/// Default trail version for records written before versioning existed.
const fn default_record_version() -> u32 {
    1
}

/// A side effect requested by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EngineCommand {
    /// Record a newly detected, unlinked change in `watching`.
    InsertChange { change: DetectedChange },

    /// Append a checkpoint. Append-only; at most one per `(change, horizon)`.
    AppendCheckpoint { checkpoint: Checkpoint },

    /// Apply a status transition, guarded by the status it was computed from.
    ApplyTransition {
        change_id: String,
        from: ChangeStatus,
        transition: StatusTransition,
    },

    /// A confirmed link: refresh the tracked change's latest observed content.
    UpdateObservation {
        change_id: String,
        after: String,
        seen_at: DateTime<Utc>,
    },
}

impl EngineCommand {
    /// ID of the detected change this command touches.
    #[must_use]
    pub fn change_id(&self) -> &str {
        match self {
            Self::InsertChange { change } => &change.id,
            Self::AppendCheckpoint { checkpoint } => &checkpoint.change_id,
            Self::ApplyTransition { change_id, .. } | Self::UpdateObservation { change_id, .. } => {
                change_id
            }
        }
    }

    #[must_use]
    pub const fn op_name(&self) -> &'static str {
        match self {
            Self::InsertChange { .. } => "insert_change",
            Self::AppendCheckpoint { .. } => "append_checkpoint",
            Self::ApplyTransition { .. } => "apply_transition",
            Self::UpdateObservation { .. } => "update_observation",
        }
    }
}

/// A single executed command as recorded in the JSONL trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CommandRecord {
    /// Schema version. Defaults to 1 for records without this field.
    #[serde(default = "default_record_version")]
    pub v: u32,

    /// ISO 8601 timestamp of execution.
    pub ts: String,

    /// Whether the persistence layer actually applied the command
    /// (`false` for an ignored duplicate checkpoint or a stale transition).
    pub applied: bool,

    pub command: EngineCommand,
}
