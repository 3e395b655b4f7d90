//! ID prefixes for Vigil entities.
//!
//! IDs are `{prefix}-{8 hex chars}`, e.g. `chg-a3f8b2c1`. The hex part is
//! generated by the database (`randomblob(4)`), see `vigil-db`.

/// Detected change.
pub const PREFIX_CHANGE: &str = "chg";

/// Checkpoint (one horizon evaluation of one change).
pub const PREFIX_CHECKPOINT: &str = "ckp";

/// Row-count snapshot.
pub const PREFIX_SNAPSHOT: &str = "snp";

/// Format a prefixed ID from its parts.
#[must_use]
pub fn format_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}

/// Split a prefixed ID into `(prefix, suffix)`.
#[must_use]
pub fn split_id(id: &str) -> Option<(&str, &str)> {
    id.split_once('-').filter(|(p, s)| !p.is_empty() && !s.is_empty())
}
