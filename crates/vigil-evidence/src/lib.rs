//! # vigil-evidence
//!
//! The deterministic core of Vigil. Every function here is pure and
//! synchronous: no I/O, no clocks, no shared state. Side effects leave the
//! crate as [`vigil_core::commands::EngineCommand`]s built by [`plan`].
//!
//! Leaf-first:
//! - [`windows`] derives before/after comparison windows for a horizon.
//! - [`schedule`] decides which horizons are due for a change.
//! - [`assess`] classifies metric deltas and reduces them to one verdict.
//! - [`transition`] is the status state machine.
//! - [`plan`] turns one evaluated horizon into engine commands.
//! - [`digest`] renders checkpoint history for prompts and per-horizon chips.

pub mod assess;
pub mod digest;
pub mod plan;
pub mod schedule;
pub mod transition;
pub mod windows;

pub use assess::{AssessmentPolicy, SIGNIFICANCE_THRESHOLD_PERCENT, assess_metrics};
pub use digest::{format_checkpoint_digest, horizon_chips};
pub use plan::plan_checkpoint;
pub use schedule::due_horizons;
pub use transition::{
    EarlyResolutionPolicy, resolve_early_transition, resolve_lifecycle_transition,
    resolve_status_transition,
};
pub use windows::compute_windows;
