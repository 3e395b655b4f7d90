//! Row-count snapshots of tracked business tables.

use chrono::{DateTime, Utc};

use vigil_core::entities::RowCountSnapshot;
use vigil_core::ids::PREFIX_SNAPSHOT;

use crate::VigilDb;
use crate::error::DatabaseError;
use crate::helpers::format_datetime;

impl VigilDb {
    /// Store the row count of `table_name` at `captured_at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn record_row_count(
        &self,
        table_name: &str,
        row_count: i64,
        captured_at: DateTime<Utc>,
    ) -> Result<RowCountSnapshot, DatabaseError> {
        if row_count < 0 {
            return Err(DatabaseError::InvalidState(format!(
                "row count for '{table_name}' cannot be negative ({row_count})"
            )));
        }

        let id = self.generate_id(PREFIX_SNAPSHOT).await?;
        self.conn()
            .execute(
                "INSERT INTO row_count_snapshots (id, table_name, row_count, captured_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    id.as_str(),
                    table_name,
                    row_count,
                    format_datetime(captured_at)
                ],
            )
            .await?;

        Ok(RowCountSnapshot {
            id,
            table_name: table_name.to_string(),
            row_count,
            captured_at,
        })
    }

    /// Latest row count of `table_name` captured at or before `at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn row_count_at(
        &self,
        table_name: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<i64>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT row_count FROM row_count_snapshots
                 WHERE table_name = ?1 AND captured_at <= ?2
                 ORDER BY captured_at DESC LIMIT 1",
                libsql::params![table_name, format_datetime(at)],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }
}
