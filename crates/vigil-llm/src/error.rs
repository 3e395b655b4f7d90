use thiserror::Error;

/// Maximum number of raw-output characters kept for diagnostics.
pub const PREVIEW_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum LlmError {
    /// LLM output is still not the expected JSON after extraction and repair.
    #[error("LLM output could not be parsed: {source}; raw output starts with: {preview}")]
    Unparseable {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("reconciliation needs {needed} fresh change IDs, got {got}")]
    MissingIds { needed: usize, got: usize },
}

impl LlmError {
    pub(crate) fn unparseable(raw: &str, source: serde_json::Error) -> Self {
        Self::Unparseable {
            preview: raw.chars().take(PREVIEW_CHARS).collect(),
            source,
        }
    }
}
