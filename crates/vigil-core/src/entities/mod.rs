//! Entity structs for Vigil domain objects.
//!
//! Each persisted entity maps to a table in the libSQL database (see `vigil-db`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod change;
mod checkpoint;
mod chip;
mod matching;
mod metric;
mod snapshot;
mod transition;

pub use change::DetectedChange;
pub use checkpoint::{Checkpoint, ComparisonWindows};
pub use chip::{ChipState, HorizonChip};
pub use matching::{MatchCandidate, MatchDecision, MatchProposal};
pub use metric::{MetricComparison, MetricDelta};
pub use snapshot::RowCountSnapshot;
pub use transition::StatusTransition;
