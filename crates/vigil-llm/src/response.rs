//! Shape of the LLM audit response.

use serde::{Deserialize, Serialize};
use vigil_core::entities::MatchProposal;
use vigil_core::enums::ChangeScope;

use crate::error::LlmError;
use crate::extract::extract_json;

/// Top-level audit JSON: `{"changes": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditResponse {
    #[serde(default)]
    pub changes: Vec<ObservedChange>,
}

/// One change the LLM says it saw, with an optional link proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservedChange {
    pub element: String,
    pub scope: ChangeScope,
    #[serde(default)]
    pub before: String,
    pub after: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub matched_change_id: Option<String>,
    #[serde(default)]
    pub match_confidence: Option<f64>,
    #[serde(default)]
    pub match_rationale: Option<String>,
}

impl ObservedChange {
    /// The link proposal, if the LLM made one.
    ///
    /// A missing confidence counts as zero so it can never pass the gate.
    #[must_use]
    pub fn proposal(&self) -> Option<MatchProposal> {
        let target_id = self
            .matched_change_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;

        Some(MatchProposal {
            target_id: target_id.to_owned(),
            confidence: self.match_confidence.unwrap_or(0.0),
            rationale: self.match_rationale.clone().unwrap_or_default(),
        })
    }
}

/// Extract, repair and deserialize a raw audit response.
///
/// # Errors
///
/// Returns [`LlmError::Unparseable`] carrying the start of `raw` when the
/// repaired text still does not deserialize.
pub fn parse_audit_response(raw: &str) -> Result<AuditResponse, LlmError> {
    let json = extract_json(raw);
    serde_json::from_str(&json).map_err(|source| LlmError::unparseable(raw, source))
}
