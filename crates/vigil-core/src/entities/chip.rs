use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Assessment, Horizon};

/// Whether a horizon chip shows a computed checkpoint or a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChipState {
    Computed,
    Future,
}

/// One per-horizon chip for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HorizonChip {
    #[schemars(with = "u32")]
    pub horizon: Horizon,
    pub state: ChipState,
    pub assessment: Option<Assessment>,
    pub reasoning: Option<String>,
    pub is_decision: bool,
}
