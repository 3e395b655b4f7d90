//! Metric source error types.

use thiserror::Error;
use vigil_db::error::DatabaseError;

/// Errors a single metric source can report.
///
/// The gatherer never propagates these: a failing source contributes no
/// metrics to the checkpoint and the failure is logged.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The analytics API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The source is missing required configuration.
    #[error("{0} source is not configured")]
    NotConfigured(String),

    /// The source did not answer within its per-source timeout.
    #[error("timed out after {millis}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        millis: u128,
    },

    /// Snapshot lookup failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
