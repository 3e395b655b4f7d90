//! Plausible-compatible Stats API v2 client.
//!
//! One checkpoint issues two aggregate queries for the page, one per
//! comparison window, and pairs the results into [`MetricDelta`]s.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::time::Duration;

use vigil_config::AnalyticsConfig;
use vigil_core::entities::{ComparisonWindows, MetricDelta};

use crate::error::MetricsError;
use crate::http::check_response;

/// Provider metric names and the names Vigil records them under, in query order.
pub const ANALYTICS_METRICS: [(&str, &str); 3] = [
    ("pageviews", "pageviews"),
    ("visitors", "unique_visitors"),
    ("bounce_rate", "bounce_rate"),
];

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryRow>,
}

#[derive(Deserialize)]
struct QueryRow {
    metrics: Vec<Option<f64>>,
}

/// HTTP client for the analytics provider.
pub struct AnalyticsClient {
    http: reqwest::Client,
    config: AnalyticsConfig,
}

impl AnalyticsClient {
    /// Build a client for a configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::NotConfigured`] when the API key or site is
    /// missing, or [`MetricsError::Http`] if the HTTP client cannot be built.
    pub fn new(config: AnalyticsConfig, request_timeout: Duration) -> Result<Self, MetricsError> {
        if !config.is_configured() {
            return Err(MetricsError::NotConfigured("analytics".into()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Compare the page's traffic metrics across both windows.
    ///
    /// Metrics the provider leaves empty in either window are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if either query fails or cannot be parsed.
    pub async fn compare(
        &self,
        page: &str,
        windows: &ComparisonWindows,
    ) -> Result<Vec<MetricDelta>, MetricsError> {
        let (before, after) = tokio::try_join!(
            self.aggregate(page, windows.before_start, windows.before_end),
            self.aggregate(page, windows.after_start, windows.after_end),
        )?;
        Ok(pair_values(&before, &after))
    }

    async fn aggregate(
        &self,
        page: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Option<f64>>, MetricsError> {
        let body = query_body(&self.config.site_id, page, start, end);
        let resp = check_response(
            self.http
                .post(self.config.query_url())
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        let text = resp.text().await?;
        parse_aggregate(&text)
    }
}

/// Request body for an aggregate query over `[start, end]`.
fn query_body(
    site_id: &str,
    page: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> serde_json::Value {
    let metrics: Vec<&str> = ANALYTICS_METRICS.iter().map(|(provider, _)| *provider).collect();
    serde_json::json!({
        "site_id": site_id,
        "metrics": metrics,
        "date_range": [
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ],
        "filters": [["is", "event:page", [page]]],
    })
}

/// Extract the aggregate metric values from a query response.
///
/// An empty `results` array means the provider saw no traffic and yields
/// no values at all.
fn parse_aggregate(body: &str) -> Result<Vec<Option<f64>>, MetricsError> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|e| MetricsError::Parse(e.to_string()))?;

    let Some(row) = response.results.into_iter().next() else {
        return Ok(vec![None; ANALYTICS_METRICS.len()]);
    };
    if row.metrics.len() != ANALYTICS_METRICS.len() {
        return Err(MetricsError::Parse(format!(
            "expected {} metric values, got {}",
            ANALYTICS_METRICS.len(),
            row.metrics.len()
        )));
    }
    Ok(row.metrics)
}

fn pair_values(before: &[Option<f64>], after: &[Option<f64>]) -> Vec<MetricDelta> {
    ANALYTICS_METRICS
        .iter()
        .zip(before.iter().zip(after))
        .filter_map(|((_, name), pair)| match pair {
            (Some(b), Some(a)) => Some(MetricDelta::from_values(*name, *b, *a)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use vigil_core::enums::MetricDirection;

    #[test]
    fn query_body_filters_on_page_and_range() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let body = query_body("example.com", "/pricing", start, end);

        assert_eq!(
            body,
            serde_json::json!({
                "site_id": "example.com",
                "metrics": ["pageviews", "visitors", "bounce_rate"],
                "date_range": ["2024-01-01T00:00:00Z", "2024-01-31T00:00:00Z"],
                "filters": [["is", "event:page", ["/pricing"]]],
            })
        );
    }

    #[test]
    fn parses_aggregate_row() {
        let body = r#"{
            "results": [{"metrics": [1200, 800, 45.5], "dimensions": []}],
            "meta": {},
            "query": {"site_id": "example.com"}
        }"#;
        assert_eq!(
            parse_aggregate(body).unwrap(),
            vec![Some(1200.0), Some(800.0), Some(45.5)]
        );
    }

    #[test]
    fn empty_results_mean_no_values() {
        assert_eq!(
            parse_aggregate(r#"{"results": []}"#).unwrap(),
            vec![None, None, None]
        );
    }

    #[test]
    fn short_metric_row_is_a_parse_error() {
        let err = parse_aggregate(r#"{"results": [{"metrics": [1, 2]}]}"#).unwrap_err();
        assert!(matches!(err, MetricsError::Parse(msg) if msg.contains("expected 3")));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(
            parse_aggregate("<html>Bad Gateway</html>"),
            Err(MetricsError::Parse(_))
        ));
    }

    #[test]
    fn pairing_renames_visitors_and_skips_missing_values() {
        let before = [Some(1000.0), Some(400.0), None];
        let after = [Some(1100.0), Some(380.0), Some(41.0)];
        let deltas = pair_values(&before, &after);

        let names: Vec<&str> = deltas.iter().map(|d| d.metric.as_str()).collect();
        assert_eq!(names, vec!["pageviews", "unique_visitors"]);
        assert_eq!(deltas[0].direction, MetricDirection::Up);
        assert!((deltas[1].change_percent - -5.0).abs() < 1e-9);
    }

    #[test]
    fn unconfigured_client_is_refused() {
        let err = AnalyticsClient::new(AnalyticsConfig::default(), Duration::from_secs(5));
        assert!(matches!(err, Err(MetricsError::NotConfigured(_))));
    }
}
