use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::DetectedChange;
use crate::enums::{ChangeScope, MatchGate};

/// A watching change as shown to the LLM: never raw internal state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MatchCandidate {
    pub id: String,
    pub element: String,
    pub scope: ChangeScope,
    pub after: String,
}

impl From<&DetectedChange> for MatchCandidate {
    fn from(change: &DetectedChange) -> Self {
        Self {
            id: change.id.clone(),
            element: change.element.clone(),
            scope: change.scope,
            after: change.after.clone(),
        }
    }
}

/// Untrusted LLM claim that a new observation continues a tracked change.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MatchProposal {
    pub target_id: String,
    /// Claimed confidence in `[0, 1]`.
    pub confidence: f64,
    pub rationale: String,
}

/// Outcome of running a proposal through the match validation gate.
///
/// Confidence and rationale are kept on rejection for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MatchDecision {
    pub accepted: bool,
    pub target_id: String,
    pub confidence: f64,
    pub rationale: String,
    pub failed_gate: Option<MatchGate>,
    pub rejection_reason: Option<String>,
}
