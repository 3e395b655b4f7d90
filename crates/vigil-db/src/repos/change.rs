//! Detected change repository.

use chrono::{DateTime, Utc};

use vigil_core::entities::DetectedChange;
use vigil_core::enums::ChangeStatus;

use crate::VigilDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum};

const CHANGE_COLUMNS: &str = "id, page, element, scope, before_content, after_content, description, status, first_detected_at, last_seen_at, updated_at";

pub(crate) const INSERT_CHANGE_SQL: &str = "INSERT INTO changes (id, page, element, scope, before_content, after_content, description, status, first_detected_at, last_seen_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
     ON CONFLICT(id) DO NOTHING";

pub(crate) const UPDATE_OBSERVATION_SQL: &str =
    "UPDATE changes SET after_content = ?1, last_seen_at = ?2, updated_at = ?2 WHERE id = ?3";

pub(crate) const GUARDED_STATUS_SQL: &str =
    "UPDATE changes SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4";

pub(crate) fn insert_params(change: &DetectedChange) -> impl libsql::params::IntoParams {
    libsql::params![
        change.id.as_str(),
        change.page.as_str(),
        change.element.as_str(),
        change.scope.as_str(),
        change.before.as_str(),
        change.after.as_str(),
        change.description.as_deref(),
        change.status.as_str(),
        format_datetime(change.first_detected_at),
        format_datetime(change.last_seen_at),
        format_datetime(change.updated_at)
    ]
}

fn row_to_change(row: &libsql::Row) -> Result<DetectedChange, DatabaseError> {
    Ok(DetectedChange {
        id: row.get::<String>(0)?,
        page: row.get::<String>(1)?,
        element: row.get::<String>(2)?,
        scope: parse_enum(&row.get::<String>(3)?)?,
        before: row.get::<String>(4)?,
        after: row.get::<String>(5)?,
        description: get_opt_string(row, 6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        first_detected_at: parse_datetime(&row.get::<String>(8)?)?,
        last_seen_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl VigilDb {
    /// Insert a detected change. Returns `false` if the ID already exists.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn insert_change(&self, change: &DetectedChange) -> Result<bool, DatabaseError> {
        let inserted = self
            .conn()
            .execute(INSERT_CHANGE_SQL, insert_params(change))
            .await?;
        Ok(inserted > 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no change has this ID.
    pub async fn get_change(&self, id: &str) -> Result<DetectedChange, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {CHANGE_COLUMNS} FROM changes WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_change(&row)
    }

    /// Changes in the given status, most recently detected first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row parsing fails.
    pub async fn list_changes_by_status(
        &self,
        status: ChangeStatus,
    ) -> Result<Vec<DetectedChange>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {CHANGE_COLUMNS} FROM changes WHERE status = ?1
                     ORDER BY first_detected_at DESC"
                ),
                [status.as_str()],
            )
            .await?;
        collect_changes(rows).await
    }

    /// Every change, most recently detected first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row parsing fails.
    pub async fn list_changes(&self) -> Result<Vec<DetectedChange>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!("SELECT {CHANGE_COLUMNS} FROM changes ORDER BY first_detected_at DESC"),
                (),
            )
            .await?;
        collect_changes(rows).await
    }

    /// Record the latest observed content of a linked change.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no change has this ID.
    pub async fn update_observation(
        &self,
        id: &str,
        after: &str,
        seen_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let updated = self
            .conn()
            .execute(
                UPDATE_OBSERVATION_SQL,
                libsql::params![after, format_datetime(seen_at), id],
            )
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

async fn collect_changes(mut rows: libsql::Rows) -> Result<Vec<DetectedChange>, DatabaseError> {
    let mut changes = Vec::new();
    while let Some(row) = rows.next().await? {
        changes.push(row_to_change(&row)?);
    }
    Ok(changes)
}

