//! Analytics provider configuration (Plausible Stats API v2).

use serde::{Deserialize, Serialize};

/// Default Plausible API endpoint.
fn default_endpoint() -> String {
    String::from("https://plausible.io")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// Stats API key (Bearer token).
    #[serde(default)]
    pub api_key: String,

    /// Site domain as registered with the provider.
    #[serde(default)]
    pub site_id: String,

    /// API base URL. Self-hosted instances override this.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            site_id: String::new(),
            endpoint: default_endpoint(),
        }
    }
}

impl AnalyticsConfig {
    /// Check if the analytics config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.site_id.is_empty()
    }

    /// Full URL of the v2 query endpoint.
    #[must_use]
    pub fn query_url(&self) -> String {
        format!("{}/api/v2/query", self.endpoint.trim_end_matches('/'))
    }
}
