//! Concurrent fan-out over every configured metric source.

use futures::future::join_all;
use std::time::Duration;

use vigil_config::VigilConfig;
use vigil_core::entities::{ComparisonWindows, MetricDelta};
use vigil_db::VigilDb;

use crate::analytics::AnalyticsClient;
use crate::database::DatabaseAdapter;
use crate::error::MetricsError;
use crate::source::MetricSource;

/// Collects metric deltas for one checkpoint.
pub struct MetricGatherer<'a> {
    sources: Vec<MetricSource<'a>>,
    timeout: Duration,
}

impl<'a> MetricGatherer<'a> {
    #[must_use]
    pub const fn new(sources: Vec<MetricSource<'a>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// Build the sources the configuration enables.
    ///
    /// Analytics is used only when configured; the database source only when
    /// tables are tracked.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if the analytics HTTP client cannot be built.
    pub fn from_config(config: &VigilConfig, db: &'a VigilDb) -> Result<Self, MetricsError> {
        let timeout = config.metrics.source_timeout();
        let mut sources = Vec::new();

        if config.analytics.is_configured() {
            sources.push(MetricSource::Analytics(AnalyticsClient::new(
                config.analytics.clone(),
                timeout,
            )?));
        } else {
            tracing::debug!("analytics not configured, skipping source");
        }

        if config.database.has_tracked_tables() {
            sources.push(MetricSource::Database(DatabaseAdapter::new(
                db,
                config.database.tracked_tables.clone(),
            )));
        }

        Ok(Self::new(sources, timeout))
    }

    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(MetricSource::name).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Query every source concurrently and merge their deltas.
    ///
    /// A source that errors or exceeds the timeout is logged and contributes
    /// nothing; the result may be empty.
    pub async fn gather(&self, page: &str, windows: &ComparisonWindows) -> Vec<MetricDelta> {
        let fetches = self.sources.iter().map(|source| async move {
            let outcome = tokio::time::timeout(self.timeout, source.compare(page, windows))
                .await
                .unwrap_or_else(|_| {
                    Err(MetricsError::Timeout {
                        millis: self.timeout.as_millis(),
                    })
                });
            (source.name(), outcome)
        });

        let mut deltas = Vec::new();
        for (source, outcome) in join_all(fetches).await {
            match outcome {
                Ok(found) => {
                    tracing::debug!(source, page, count = found.len(), "metric source returned");
                    deltas.extend(found);
                }
                Err(e) => tracing::warn!(source, page, %e, "metric source failed"),
            }
        }
        deltas
    }
}
