use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ChangeScope, ChangeStatus};

/// A specific modification observed between two scans of a page.
///
/// Never deleted: a change ends as `reverted` or `superseded`. The status is
/// only ever written from a `StatusTransition`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DetectedChange {
    pub id: String,
    /// Page path or URL the change was observed on.
    pub page: String,
    /// Human-readable label of the changed element or section.
    pub element: String,
    pub scope: ChangeScope,
    pub before: String,
    pub after: String,
    pub description: Option<String>,
    pub status: ChangeStatus,
    pub first_detected_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
