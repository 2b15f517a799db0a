//! Staff records, immutable for the duration of a solve.

use std::collections::HashSet;

/// One employee's roster-relevant attributes (spec §3). `gender`, `role` and
/// `seniority` style fields exist in the source but are passed through
/// unused by the core and are deliberately not modeled here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaffRecord {
    /// Unique within the branch; used as the row key everywhere downstream.
    pub name: String,
    pub target_off: u32,
    pub skills: HashSet<String>,
}

impl StaffRecord {
    pub fn new(name: impl Into<String>, target_off: u32, skills: HashSet<String>) -> Self {
        Self {
            name: name.into(),
            target_off,
            skills,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }
}
