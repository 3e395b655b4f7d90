//! The closed set of metric sources a checkpoint can draw on.

use vigil_core::entities::{ComparisonWindows, MetricDelta};

use crate::analytics::AnalyticsClient;
use crate::database::DatabaseAdapter;
use crate::error::MetricsError;

/// A metric provider, normalised to [`MetricDelta`]s before assessment.
pub enum MetricSource<'a> {
    Analytics(AnalyticsClient),
    Database(DatabaseAdapter<'a>),
}

impl MetricSource<'_> {
    /// Stable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Analytics(_) => "analytics",
            Self::Database(_) => "database",
        }
    }

    /// Compare this source's metrics for `page` across both windows.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] when the underlying provider fails.
    pub async fn compare(
        &self,
        page: &str,
        windows: &ComparisonWindows,
    ) -> Result<Vec<MetricDelta>, MetricsError> {
        match self {
            Self::Analytics(client) => client.compare(page, windows).await,
            Self::Database(adapter) => adapter.compare(windows).await,
        }
    }
}
