//! Status enums, scopes, assessments, and the horizon domain for Vigil.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! except [`Horizon`], which serializes as its day count.
//! [`ChangeStatus`] provides `allowed_next_states()` so the persistence layer
//! can refuse updates the state table does not allow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ChangeStatus
// ---------------------------------------------------------------------------

/// Status of a detected change through its evidence lifecycle.
///
/// ```text
/// watching → validated ⇄ regressed
///          → inconclusive → validated | regressed
///          → (any non-terminal) → reverted | superseded   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Watching,
    Validated,
    Regressed,
    Inconclusive,
    Reverted,
    Superseded,
}

impl ChangeStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Watching => &[
                Self::Validated,
                Self::Regressed,
                Self::Inconclusive,
                Self::Reverted,
                Self::Superseded,
            ],
            Self::Validated => &[Self::Regressed, Self::Reverted, Self::Superseded],
            Self::Regressed => &[Self::Validated, Self::Reverted, Self::Superseded],
            Self::Inconclusive => &[
                Self::Validated,
                Self::Regressed,
                Self::Reverted,
                Self::Superseded,
            ],
            Self::Reverted | Self::Superseded => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Terminal statuses accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Reverted | Self::Superseded)
    }

    /// A status produced by the first canonical resolution at the decision horizon.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Validated | Self::Regressed | Self::Inconclusive)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watching => "watching",
            Self::Validated => "validated",
            Self::Regressed => "regressed",
            Self::Inconclusive => "inconclusive",
            Self::Reverted => "reverted",
            Self::Superseded => "superseded",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChangeScope
// ---------------------------------------------------------------------------

/// How much of the page a detected change covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeScope {
    Element,
    Section,
    Page,
}

impl ChangeScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Section => "section",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for ChangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Overall verdict of one checkpoint, reduced from its metric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Improved,
    Regressed,
    Neutral,
    Inconclusive,
}

impl Assessment {
    /// `improved` or `regressed`; the only verdicts allowed to reverse a resolution.
    #[must_use]
    pub const fn is_decisive(self) -> bool {
        matches!(self, Self::Improved | Self::Regressed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Regressed => "regressed",
            Self::Neutral => "neutral",
            Self::Inconclusive => "inconclusive",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MetricAssessment
// ---------------------------------------------------------------------------

/// Per-metric classification after applying the significance threshold and polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricAssessment {
    Improved,
    Regressed,
    Neutral,
}

impl MetricAssessment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Regressed => "regressed",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MetricAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MetricDirection
// ---------------------------------------------------------------------------

/// Raw direction of a metric between windows, before polarity is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    Up,
    Down,
    Flat,
}

impl MetricDirection {
    /// Direction implied by a signed percent change.
    #[must_use]
    pub fn from_change_percent(change_percent: f64) -> Self {
        if change_percent > 0.0 {
            Self::Up
        } else if change_percent < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for MetricDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Horizon
// ---------------------------------------------------------------------------

/// Fixed number of days after detection at which a change is re-evaluated.
///
/// Serialized as the bare day count (`30`, not `"d30"`). Variant order is
/// horizon order, so `Ord` sorts by days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Horizon {
    D7,
    D14,
    D30,
    D60,
    D90,
}

impl Horizon {
    /// Every horizon, in ascending order.
    pub const ALL: [Self; 5] = [Self::D7, Self::D14, Self::D30, Self::D60, Self::D90];

    /// The horizon at which a change is first canonically resolved out of `watching`.
    pub const DECISION: Self = Self::D30;

    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::D7 => 7,
            Self::D14 => 14,
            Self::D30 => 30,
            Self::D60 => 60,
            Self::D90 => 90,
        }
    }

    #[must_use]
    pub const fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(Self::D7),
            14 => Some(Self::D14),
            30 => Some(Self::D30),
            60 => Some(Self::D60),
            90 => Some(Self::D90),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_decision(self) -> bool {
        self == Self::DECISION
    }

    /// Signal-only horizons before the decision horizon.
    #[must_use]
    pub fn is_early(self) -> bool {
        self < Self::DECISION
    }
}

impl From<Horizon> for u32 {
    fn from(horizon: Horizon) -> Self {
        horizon.days()
    }
}

impl TryFrom<u32> for Horizon {
    type Error = CoreError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::from_days(days).ok_or_else(|| {
            CoreError::Validation(format!(
                "unknown horizon {days}d (expected one of 7, 14, 30, 60, 90)"
            ))
        })
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D+{}", self.days())
    }
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events outside the metric flow that end a change's evidence lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The page went back to the content it had before the change.
    Reverted,
    /// A newer, unrelated change replaced this one.
    Superseded,
}

impl LifecycleEvent {
    /// The terminal status this event leads to.
    #[must_use]
    pub const fn target_status(self) -> ChangeStatus {
        match self {
            Self::Reverted => ChangeStatus::Reverted,
            Self::Superseded => ChangeStatus::Superseded,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reverted => "reverted",
            Self::Superseded => "superseded",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MatchGate
// ---------------------------------------------------------------------------

/// The three checks an LLM match proposal must pass, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchGate {
    CandidateSet,
    Confidence,
    ScopeCompatibility,
}

impl MatchGate {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CandidateSet => "candidate_set",
            Self::Confidence => "confidence",
            Self::ScopeCompatibility => "scope_compatibility",
        }
    }
}

impl fmt::Display for MatchGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
