//! Rule tree: a tagged variant replacing the source's dynamic string
//! dispatch (REDESIGN FLAGS). Each [`RuleKind`] variant carries a typed,
//! kind-specific payload; mandatory-key absence decodes to `None` and the
//! rule is reported as [`crate::error::RuleSkipped`] rather than reaching
//! the compiler (§4.2, §6.2, §7).

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Well-known skill tag referenced by the Stage-1 default L1 soft term.
pub const SKILL_L1: &str = "L1";
/// Well-known skill tag referenced by the Stage-1 default night balance term.
pub const SKILL_NIGHT: &str = "NIGHT";

/// Shared upper bound on a rule's weight (spec §3).
pub const MAX_WEIGHT: u32 = 200_000;

/// A single rule in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleNode {
    pub id: String,
    pub enabled: bool,
    pub weight: u32,
    pub priority: i32,
    pub kind: RuleKind,
    /// `description_<lang>` fields, retained verbatim; never interpreted by
    /// the core (localization is out of scope).
    #[cfg_attr(feature = "serde", serde(default))]
    pub descriptions: HashMap<String, String>,
}

/// Fixed, compile-time enumeration of rule kinds. Unrecognized `type` tags
/// fail to deserialize into this enum at the call site and are reported as
/// [`crate::error::RuleSkipped`] by the caller before a `RuleNode` is ever
/// constructed; malformed payloads for a recognized tag are caught by the
/// `Option<..Payload>` decode helpers in [`crate::rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "rule"))]
pub enum RuleKind {
    #[cfg_attr(feature = "serde", serde(rename = "basic"))]
    Basic(BasicPayload),
    #[cfg_attr(feature = "serde", serde(rename = "skill_match"))]
    SkillMatch(SkillMatchPayload),
    #[cfg_attr(feature = "serde", serde(rename = "forbidden"))]
    Forbidden,
    #[cfg_attr(feature = "serde", serde(rename = "sequence"))]
    Sequence(SequencePayload),
    #[cfg_attr(feature = "serde", serde(rename = "rolling_window"))]
    RollingWindow(RollingWindowPayload),
    #[cfg_attr(feature = "serde", serde(rename = "preference"))]
    Preference(PreferencePayload),
    #[cfg_attr(feature = "serde", serde(rename = "balance"))]
    Balance(BalancePayload),
    #[cfg_attr(feature = "serde", serde(rename = "coverage"))]
    Coverage(CoveragePayload),
}

impl RuleKind {
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Basic(_) => "basic",
            RuleKind::SkillMatch(_) => "skill_match",
            RuleKind::Forbidden => "forbidden",
            RuleKind::Sequence(_) => "sequence",
            RuleKind::RollingWindow(_) => "rolling_window",
            RuleKind::Preference(_) => "preference",
            RuleKind::Balance(_) => "balance",
            RuleKind::Coverage(_) => "coverage",
        }
    }
}

/// `exactly_one_shift_per_day=true` is already enforced by the variable
/// model (§4.1); this payload exists only so the rule can be declared and
/// round-tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicPayload {
    #[cfg_attr(feature = "serde", serde(default))]
    pub exactly_one_shift_per_day: bool,
}

/// `shift_code → required_skill`. Always hard.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkillMatchPayload {
    pub shift_skill_map: HashMap<String, String>,
}

/// `after_shifts` on day `d` implies `next_day_must_be` on day `d+1`.
/// Always hard.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequencePayload {
    pub after_shifts: Vec<String>,
    pub next_day_must_be: Vec<String>,
}

/// Caps non-off days to `max_consecutive_work_days` inside every rolling
/// window of that length plus one day. Always hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingWindowPayload {
    pub max_consecutive_work_days: u32,
}

/// Either or both sub-semantics may be set on one `preference` rule node.
/// Always soft; both contribute `weight · <indicator>` to the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PreferencePayload {
    #[cfg_attr(feature = "serde", serde(default))]
    pub maximize_request_satisfaction: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefer_full_weekend_off_or_work: bool,
}

/// Any subset of the three balance sub-semantics may be set. Always soft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BalancePayload {
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_off_days_field: bool,
    /// `L`: the set of shift codes whose per-staff count is to be balanced.
    #[cfg_attr(feature = "serde", serde(default))]
    pub balance_shifts: Option<Vec<String>>,
    /// `σ`: restrict balancing to staff holding this skill; `None` means all.
    #[cfg_attr(feature = "serde", serde(default))]
    pub among_staff_with_skill: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub balance_weekend_work: bool,
}

/// Any subset of the three coverage sub-semantics may be set. `hard`
/// selects the equality/implication form over the slack-penalized soft
/// form for every sub-semantic present on this node (spec §4.2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoveragePayload {
    #[cfg_attr(feature = "serde", serde(default))]
    pub hard: bool,
    pub min_staff_per_day: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclude_shifts: Vec<String>,
    pub shift_code: Option<String>,
    pub exactly_per_day: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_closed_days: bool,
    pub night_shift_count: Option<u32>,
}

impl CoveragePayload {
    pub fn has_any_subsemantic(&self) -> bool {
        self.min_staff_per_day.is_some()
            || (self.shift_code.is_some() && self.exactly_per_day.is_some())
            || (self.on_closed_days && self.night_shift_count.is_some())
    }
}
