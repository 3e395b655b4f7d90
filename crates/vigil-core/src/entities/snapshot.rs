use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Row count of a tracked business table at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RowCountSnapshot {
    pub id: String,
    pub table_name: String,
    pub row_count: i64,
    pub captured_at: DateTime<Utc>,
}
