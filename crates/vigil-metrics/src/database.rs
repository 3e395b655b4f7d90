//! Row-count snapshot source.
//!
//! Business tables are tracked site-wide, so the page is not a filter here.
//! For each table the adapter compares rows added during the before window
//! with rows added during the after window.

use chrono::{DateTime, Utc};

use vigil_core::entities::{ComparisonWindows, MetricDelta};
use vigil_db::VigilDb;

use crate::error::MetricsError;

/// Suffix of the metric name recorded for a tracked table.
pub const ROWS_ADDED_SUFFIX: &str = "_rows_added";

/// Compares row-count growth of tracked tables across windows.
pub struct DatabaseAdapter<'a> {
    db: &'a VigilDb,
    tables: Vec<String>,
}

impl<'a> DatabaseAdapter<'a> {
    #[must_use]
    pub const fn new(db: &'a VigilDb, tables: Vec<String>) -> Self {
        Self { db, tables }
    }

    #[must_use]
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// One `<table>_rows_added` delta per table with snapshots at all four
    /// window bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Database`] if a snapshot lookup fails.
    pub async fn compare(
        &self,
        windows: &ComparisonWindows,
    ) -> Result<Vec<MetricDelta>, MetricsError> {
        let mut deltas = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let before = self
                .rows_added(table, windows.before_start, windows.before_end)
                .await?;
            let after = self
                .rows_added(table, windows.after_start, windows.after_end)
                .await?;

            match (before, after) {
                (Some(before), Some(after)) => deltas.push(MetricDelta::from_values(
                    format!("{table}{ROWS_ADDED_SUFFIX}"),
                    count_as_f64(before),
                    count_as_f64(after),
                )),
                _ => tracing::debug!(table = %table, "missing row-count snapshot, skipping table"),
            }
        }
        Ok(deltas)
    }

    async fn rows_added(
        &self,
        table: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<i64>, MetricsError> {
        let Some(at_start) = self.db.row_count_at(table, start).await? else {
            return Ok(None);
        };
        let Some(at_end) = self.db.row_count_at(table, end).await? else {
            return Ok(None);
        };
        Ok(Some(at_end - at_start))
    }
}

#[allow(clippy::cast_precision_loss)]
fn count_as_f64(count: i64) -> f64 {
    count as f64
}
