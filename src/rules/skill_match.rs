//! `skill_match` kind: `shift_code → required_skill`. Any staff lacking the
//! required skill is forced off that shift on every day. Always hard.

use selen::prelude::Model;

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{RuleNode, SkillMatchPayload};
use crate::error::RuleSkipped;
use crate::rules::{force_zero, CompileOutput};
use crate::variables::VariableGrid;

pub fn compile(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    rule: &RuleNode,
    payload: &SkillMatchPayload,
) -> CompileOutput {
    if payload.shift_skill_map.is_empty() {
        return CompileOutput {
            skipped: vec![RuleSkipped::new(rule.id.clone(), "shift_skill_map is empty")],
            ..Default::default()
        };
    }

    for (shift_code, required_skill) in &payload.shift_skill_map {
        let Some(shift_id) = problem.catalog.id_of(shift_code) else {
            continue;
        };
        if !grid.contains(shift_id) {
            continue;
        }
        for (staff_idx, staff) in problem.staff.iter().enumerate() {
            if staff.has_skill(required_skill) {
                continue;
            }
            for day in 1..=problem.num_days {
                if let Some(var) = grid.var(staff_idx, day, shift_id) {
                    force_zero(model, var);
                }
            }
        }
    }

    CompileOutput::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ProblemInput;
    use crate::domain::staff::StaffRecord;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn empty_map_is_reported_skipped() {
        let problem = SchedulingProblem::build(ProblemInput {
            num_days: 1,
            staff: vec![StaffRecord::new("A", 0, HashSet::new())],
            night_shifts: vec!["Q1".into()],
            ..Default::default()
        })
        .unwrap();
        let mut model = Model::default();
        let grid = VariableGrid::build(&mut model, 1, 1, &problem.catalog.full_alphabet());
        let rule = RuleNode {
            id: "sm".into(),
            enabled: true,
            weight: 0,
            priority: 0,
            kind: crate::domain::rule::RuleKind::SkillMatch(SkillMatchPayload {
                shift_skill_map: HashMap::new(),
            }),
            descriptions: Default::default(),
        };
        let out = compile(
            &mut model,
            &grid,
            &problem,
            &rule,
            &SkillMatchPayload { shift_skill_map: HashMap::new() },
        );
        assert_eq!(out.skipped.len(), 1);
    }
}
