//! Evidence engine tuning.
//!
//! The significance threshold, decision horizon and match confidence floor
//! are constants in `vigil-evidence` and `vigil-llm`, not configuration.

use serde::{Deserialize, Serialize};

fn default_lower_is_better() -> Vec<String> {
    vec![String::from("bounce_rate")]
}

const fn default_max_match_candidates() -> usize {
    20
}

const fn default_digest_history_limit() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvidenceConfig {
    /// Metrics where a decrease counts as an improvement.
    #[serde(default = "default_lower_is_better")]
    pub lower_is_better: Vec<String>,

    /// Maximum number of watching changes offered to the LLM as match candidates.
    #[serde(default = "default_max_match_candidates")]
    pub max_match_candidates: usize,

    /// Maximum number of changes included in the checkpoint digest.
    #[serde(default = "default_digest_history_limit")]
    pub digest_history_limit: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            lower_is_better: default_lower_is_better(),
            max_match_candidates: default_max_match_candidates(),
            digest_history_limit: default_digest_history_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = EvidenceConfig::default();
        assert_eq!(config.lower_is_better, vec!["bounce_rate".to_string()]);
        assert_eq!(config.max_match_candidates, 20);
        assert_eq!(config.digest_history_limit, 10);
    }
}
