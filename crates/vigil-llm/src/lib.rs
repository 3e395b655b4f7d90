//! # vigil-llm
//!
//! Everything the LLM says is untrusted. This crate never calls a model;
//! it turns raw model text into typed data and decides which claims to believe.
//!
//! - [`extract`] recovers JSON from fenced, prose-wrapped or truncated output.
//! - [`response`] deserializes the audit response.
//! - [`gate`] validates proposed links between observed and tracked changes.
//! - [`reconcile`] turns gated observations into engine commands.

pub mod error;
pub mod extract;
pub mod gate;
pub mod reconcile;
pub mod response;

pub use error::LlmError;
pub use extract::{close_json, extract_json};
pub use gate::{MATCH_CONFIDENCE_THRESHOLD, ObservedSide, validate_match};
pub use reconcile::{
    ReconcileContext, ReconcileOutcome, Reconciliation, candidate_window, reconcile,
};
pub use response::{AuditResponse, ObservedChange, parse_audit_response};
