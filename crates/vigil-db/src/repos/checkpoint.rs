//! Checkpoint repository. Append-only: there is no update path.

use vigil_core::entities::{Checkpoint, ComparisonWindows};
use vigil_core::enums::Horizon;

use crate::VigilDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum};

pub(crate) const INSERT_CHECKPOINT_SQL: &str = "INSERT INTO checkpoints (id, change_id, horizon, before_start, before_end, after_start, after_end, metrics, assessment, reasoning, computed_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
     ON CONFLICT(change_id, horizon) DO NOTHING";

pub(crate) fn insert_params(
    checkpoint: &Checkpoint,
) -> Result<impl libsql::params::IntoParams, DatabaseError> {
    let metrics = serde_json::to_string(&checkpoint.metrics)
        .map_err(|e| DatabaseError::Other(e.into()))?;
    Ok(libsql::params![
        checkpoint.id.as_str(),
        checkpoint.change_id.as_str(),
        i64::from(checkpoint.horizon.days()),
        format_datetime(checkpoint.windows.before_start),
        format_datetime(checkpoint.windows.before_end),
        format_datetime(checkpoint.windows.after_start),
        format_datetime(checkpoint.windows.after_end),
        metrics,
        checkpoint.assessment.as_str(),
        checkpoint.reasoning.as_deref(),
        format_datetime(checkpoint.computed_at)
    ])
}

fn row_to_checkpoint(row: &libsql::Row) -> Result<Checkpoint, DatabaseError> {
    let days = row.get::<i64>(2)?;
    let horizon = u32::try_from(days)
        .ok()
        .and_then(Horizon::from_days)
        .ok_or_else(|| DatabaseError::Query(format!("Unknown horizon {days} in checkpoints")))?;
    let metrics = serde_json::from_str(&row.get::<String>(7)?)
        .map_err(|e| DatabaseError::Query(format!("Invalid metrics JSON: {e}")))?;

    Ok(Checkpoint {
        id: row.get::<String>(0)?,
        change_id: row.get::<String>(1)?,
        horizon,
        windows: ComparisonWindows {
            before_start: parse_datetime(&row.get::<String>(3)?)?,
            before_end: parse_datetime(&row.get::<String>(4)?)?,
            after_start: parse_datetime(&row.get::<String>(5)?)?,
            after_end: parse_datetime(&row.get::<String>(6)?)?,
        },
        metrics,
        assessment: parse_enum(&row.get::<String>(8)?)?,
        reasoning: get_opt_string(row, 9)?,
        computed_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl VigilDb {
    /// Append a checkpoint. Returns `false` when one already exists for the
    /// same `(change, horizon)`; the existing record is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails (e.g. unknown change).
    pub async fn record_checkpoint(&self, checkpoint: &Checkpoint) -> Result<bool, DatabaseError> {
        let inserted = self
            .conn()
            .execute(INSERT_CHECKPOINT_SQL, insert_params(checkpoint)?)
            .await?;
        Ok(inserted > 0)
    }

    /// Checkpoints of one change, ordered by horizon.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row parsing fails.
    pub async fn list_checkpoints(
        &self,
        change_id: &str,
    ) -> Result<Vec<Checkpoint>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, change_id, horizon, before_start, before_end, after_start, after_end, metrics, assessment, reasoning, computed_at
                 FROM checkpoints WHERE change_id = ?1 ORDER BY horizon",
                [change_id],
            )
            .await?;

        let mut checkpoints = Vec::new();
        while let Some(row) = rows.next().await? {
            checkpoints.push(row_to_checkpoint(&row)?);
        }
        Ok(checkpoints)
    }

    /// Horizons already evaluated for a change, ascending.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn evaluated_horizons(&self, change_id: &str) -> Result<Vec<Horizon>, DatabaseError> {
        Ok(self
            .list_checkpoints(change_id)
            .await?
            .into_iter()
            .map(|c| c.horizon)
            .collect())
    }
}
