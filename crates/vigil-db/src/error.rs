//! Errors raised while storing changes, checkpoints and snapshots.

use thiserror::Error;

/// Errors from the change store and its trail.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A stored column could not be decoded: a timestamp, an enum, an
    /// unknown horizon, or the checkpoint metrics JSON.
    #[error("Query failed: {0}")]
    Query(String),

    /// Opening the store failed while enabling foreign keys or applying the schema.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// The change (or generated ID row) being looked up does not exist.
    #[error("No result returned")]
    NoResult,

    /// A command was rejected: a status change the state table forbids, or a
    /// negative row count.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Trail file I/O or checkpoint metrics serialization failed.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
