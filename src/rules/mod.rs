//! Rule compiler (spec §4.2): lowers each [`RuleNode`] to `selen` constraints
//! and objective terms against a [`VariableGrid`]. Dispatch is a fixed
//! compile-time `match` over [`RuleKind`] — the REDESIGN FLAGS' replacement
//! for the source's dynamic string-keyed dispatch. An unrecognized or
//! structurally empty payload never reaches the per-kind translators; it is
//! turned into a [`RuleSkipped`] diagnostic here instead.

pub mod balance;
pub mod basic;
pub mod coverage;
pub mod forbidden;
pub mod preference;
pub mod rolling_window;
pub mod sequence;
pub mod skill_match;

use selen::prelude::{Model, VarId};

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{RuleKind, RuleNode};
use crate::error::RuleSkipped;
use crate::variables::VariableGrid;

/// Everything the compiler produced for one rule list: the objective terms
/// to sum and minimize, plus diagnostics for rules that were dropped.
#[derive(Default)]
pub struct CompileOutput {
    pub objective_terms: Vec<VarId>,
    pub skipped: Vec<RuleSkipped>,
}

impl CompileOutput {
    fn merge(&mut self, mut other: CompileOutput) {
        self.objective_terms.append(&mut other.objective_terms);
        self.skipped.append(&mut other.skipped);
    }
}

/// Compiles every enabled rule in `rules` against `grid`, posting hard
/// constraints directly into `model` and returning soft objective terms.
/// A disabled rule (`enabled = false`) is silently omitted, matching a UI
/// toggle rather than a malformed payload.
pub fn compile_rules(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    rules: &[RuleNode],
) -> CompileOutput {
    let mut out = CompileOutput::default();

    for rule in rules {
        if !rule.enabled {
            tracing::trace!("rule {} disabled, skipping", rule.id);
            continue;
        }

        let result = match &rule.kind {
            RuleKind::Basic(payload) => basic::compile(rule, payload),
            RuleKind::SkillMatch(payload) => skill_match::compile(model, grid, problem, rule, payload),
            RuleKind::Forbidden => forbidden::compile(model, grid, problem),
            RuleKind::Sequence(payload) => sequence::compile(model, grid, problem, rule, payload),
            RuleKind::RollingWindow(payload) => rolling_window::compile(model, grid, problem, rule, payload),
            RuleKind::Preference(payload) => preference::compile(model, grid, problem, rule, payload),
            RuleKind::Balance(payload) => balance::compile(model, grid, problem, rule, payload),
            RuleKind::Coverage(payload) => coverage::compile(model, grid, problem, rule, payload),
        };

        for skipped in &result.skipped {
            tracing::warn!("{skipped}");
        }
        out.merge(result);
    }

    out
}

/// Builds the hard "force this cell variable to zero" constraint shared by
/// `skill_match` and `forbidden`.
fn force_zero(model: &mut Model, var: VarId) {
    model.bool_lin_eq(&[1], &[var], 0);
}

/// Builds the hard "force this cell variable to one" constraint shared by
/// the Stage-1 default safety rules.
pub(crate) fn force_one(model: &mut Model, var: VarId) {
    model.bool_lin_eq(&[1], &[var], 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ProblemInput;
    use crate::domain::rule::{BasicPayload, RuleKind, RuleNode};
    use crate::domain::staff::StaffRecord;
    use std::collections::HashSet;

    fn problem() -> SchedulingProblem {
        SchedulingProblem::build(ProblemInput {
            year: 2026,
            month: 1,
            num_days: 2,
            staff: vec![StaffRecord::new("A", 0, HashSet::new())],
            day_shifts: vec!["D1".into()],
            night_shifts: vec![],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn disabled_rule_is_silently_skipped() {
        let problem = problem();
        let mut model = Model::default();
        let grid = VariableGrid::build(&mut model, problem.num_staff(), problem.num_days, &problem.catalog.full_alphabet());
        let rules = vec![RuleNode {
            id: "r1".into(),
            enabled: false,
            weight: 0,
            priority: 0,
            kind: RuleKind::Basic(BasicPayload::default()),
            descriptions: Default::default(),
        }];
        let out = compile_rules(&mut model, &grid, &problem, &rules);
        assert!(out.skipped.is_empty());
        assert!(out.objective_terms.is_empty());
    }
}
