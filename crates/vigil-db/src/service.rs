//! Service layer executing engine commands against the database and trail.
//!
//! `VigilService` wraps `VigilDb` (raw database access) and `TrailWriter`
//! (JSONL persistence). A batch of commands is applied as follows:
//! 1. Begin transaction
//! 2. Execute each command's SQL, recording whether it took effect
//! 3. Commit transaction
//! 4. Append one JSONL trail record per command

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Utc;

use vigil_core::commands::{CommandRecord, EngineCommand};

use crate::VigilDb;
use crate::error::DatabaseError;
use crate::helpers::format_datetime;
use crate::repos::change as change_repo;
use crate::repos::checkpoint as checkpoint_repo;
use crate::trail::writer::TrailWriter;

/// Current trail record version.
const TRAIL_VERSION: u32 = 1;

/// Executes engine commands atomically and mirrors them into the trail.
pub struct VigilService {
    db: VigilDb,
    trail: TrailWriter,
}

impl VigilService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. Pass `None` to disable
    ///   trail writing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
    ) -> Result<Self, DatabaseError> {
        let db = VigilDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self { db, trail })
    }

    /// Create from an existing `VigilDb`.
    #[must_use]
    pub const fn from_db(db: VigilDb, trail: TrailWriter) -> Self {
        Self { db, trail }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &VigilDb {
        &self.db
    }

    /// Access the trail writer.
    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// Apply a batch of engine commands in one transaction.
    ///
    /// Duplicates are not errors: a checkpoint for an existing
    /// `(change, horizon)` is ignored, and so is any transition planned
    /// alongside it in the same batch. A transition whose expected prior
    /// status no longer matches the stored one is ignored as stale. Each
    /// returned record says whether its command took effect.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a transition the state table
    /// forbids, rolling back the whole batch. Returns other `DatabaseError`s
    /// if SQL execution or the trail write fails.
    pub async fn apply_commands(
        &self,
        commands: Vec<EngineCommand>,
    ) -> Result<Vec<CommandRecord>, DatabaseError> {
        let tx = self.db.conn().transaction().await?;
        let records = match execute_batch(&tx, commands).await {
            Ok(records) => records,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        tx.commit().await?;

        self.trail.append(&records)?;
        Ok(records)
    }
}

async fn execute_batch(
    tx: &libsql::Transaction,
    commands: Vec<EngineCommand>,
) -> Result<Vec<CommandRecord>, DatabaseError> {
    let ts = format_datetime(Utc::now());
    let mut duplicate_checkpoints: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(commands.len());

    for command in commands {
        let applied = match &command {
            EngineCommand::InsertChange { change } => {
                tx.execute(
                    change_repo::INSERT_CHANGE_SQL,
                    change_repo::insert_params(change),
                )
                .await?
                    > 0
            }
            EngineCommand::AppendCheckpoint { checkpoint } => {
                let inserted = tx
                    .execute(
                        checkpoint_repo::INSERT_CHECKPOINT_SQL,
                        checkpoint_repo::insert_params(checkpoint)?,
                    )
                    .await?
                    > 0;
                if !inserted {
                    duplicate_checkpoints.insert(checkpoint.change_id.clone());
                }
                inserted
            }
            EngineCommand::ApplyTransition {
                change_id,
                from,
                transition,
            } => {
                if !from.can_transition_to(transition.new_status) {
                    return Err(DatabaseError::InvalidState(format!(
                        "change {change_id}: {from} -> {} is not an allowed transition",
                        transition.new_status
                    )));
                }
                if duplicate_checkpoints.contains(change_id) {
                    false
                } else {
                    tx.execute(
                        change_repo::GUARDED_STATUS_SQL,
                        libsql::params![
                            transition.new_status.as_str(),
                            ts.as_str(),
                            change_id.as_str(),
                            from.as_str()
                        ],
                    )
                    .await?
                        > 0
                }
            }
            EngineCommand::UpdateObservation {
                change_id,
                after,
                seen_at,
            } => {
                tx.execute(
                    change_repo::UPDATE_OBSERVATION_SQL,
                    libsql::params![
                        after.as_str(),
                        format_datetime(*seen_at),
                        change_id.as_str()
                    ],
                )
                .await?
                    > 0
            }
        };

        log_command(&command, applied);
        records.push(CommandRecord {
            v: TRAIL_VERSION,
            ts: ts.clone(),
            applied,
            command,
        });
    }
    Ok(records)
}

fn log_command(command: &EngineCommand, applied: bool) {
    match command {
        EngineCommand::ApplyTransition {
            change_id,
            from,
            transition,
        } if applied => {
            tracing::info!(
                change_id = %change_id,
                from = %from,
                to = %transition.new_status,
                reason = %transition.reason,
                "status transition applied"
            );
        }
        _ if !applied => {
            tracing::debug!(
                op = command.op_name(),
                change_id = command.change_id(),
                "command had no effect"
            );
        }
        _ => {}
    }
}
