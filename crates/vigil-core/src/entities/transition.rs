use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChangeStatus;

/// A status change produced by evaluating one checkpoint or lifecycle event.
///
/// Not persisted on its own; the caller applies it to the detected change.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusTransition {
    pub new_status: ChangeStatus,
    /// Audit reason, e.g. `D+30: metrics regressed`.
    pub reason: String,
}

impl StatusTransition {
    #[must_use]
    pub fn new(new_status: ChangeStatus, reason: impl Into<String>) -> Self {
        Self {
            new_status,
            reason: reason.into(),
        }
    }
}
