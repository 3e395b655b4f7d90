//! Metric gathering settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_source_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Per-source timeout for one checkpoint's fetch. A source that exceeds it
    /// contributes no metrics to that checkpoint.
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            source_timeout_secs: default_source_timeout_secs(),
        }
    }
}

impl MetricsConfig {
    #[must_use]
    pub const fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}
