//! # vigil-metrics
//!
//! Metric sources for Vigil checkpoints:
//! - a Plausible-compatible analytics API (pageviews, unique visitors, bounce rate)
//! - row-count snapshots of tracked business tables
//!
//! [`MetricGatherer`] fans out to every configured source with a per-source
//! timeout and keeps whatever comes back.

pub mod analytics;
pub mod database;
mod error;
pub mod gather;
mod http;
pub mod source;

pub use analytics::AnalyticsClient;
pub use database::DatabaseAdapter;
pub use error::MetricsError;
pub use gather::MetricGatherer;
pub use source::MetricSource;
