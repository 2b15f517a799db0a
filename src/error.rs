//! Error and diagnostic types surfaced by the core.

use thiserror::Error;

/// Errors raised synchronously, before a model is ever built.
///
/// Per the error handling policy, `Infeasible` and `Unknown` are *not*
/// modeled as errors — they are solve statuses (see
/// [`crate::domain::assignment::SolveStatus`]) returned inside a result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("invalid scheduling input: {0}")]
    InvalidInput(String),
}

/// A rule that was dropped during compilation because its payload was
/// malformed or its `kind` tag was unrecognized.
///
/// This is a warning-level diagnostic, not an error: compilation continues
/// with the remaining rules (spec §7 — "a malformed rule never aborts
/// compilation").
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleSkipped {
    pub rule_id: String,
    pub reason: String,
}

impl RuleSkipped {
    pub fn new(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for RuleSkipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule {} skipped: {}", self.rule_id, self.reason)
    }
}
