//! `coverage` kind: any subset of three sub-semantics may be set on one
//! rule node; `hard` selects equality/implication over a slack-penalized
//! soft term for every sub-semantic present (spec §4.2).

use selen::prelude::{Model, VarId};

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{CoveragePayload, RuleNode};
use crate::domain::shift::ShiftId;
use crate::error::RuleSkipped;
use crate::rules::CompileOutput;
use crate::variables::VariableGrid;

pub fn compile(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    rule: &RuleNode,
    payload: &CoveragePayload,
) -> CompileOutput {
    if !payload.has_any_subsemantic() {
        return CompileOutput {
            skipped: vec![RuleSkipped::new(rule.id.clone(), "no coverage sub-rule is configured")],
            ..Default::default()
        };
    }

    let mut out = CompileOutput::default();

    if let Some(min_staff) = payload.min_staff_per_day {
        let exclude_ids: Vec<_> = payload
            .exclude_shifts
            .iter()
            .filter_map(|code| problem.catalog.id_of(code))
            .collect();
        for day in 1..=problem.num_days {
            let work_d = day_worksome_total(model, grid, problem, day, &exclude_ids);
            post_at_least(model, rule.weight, payload.hard, work_d, min_staff, &mut out);
        }
    }

    if let (Some(code), Some(n)) = (&payload.shift_code, payload.exactly_per_day) {
        if let Some(shift_id) = problem.catalog.id_of(code).filter(|&id| grid.contains(id)) {
            for day in 1..=problem.num_days {
                let n_d = day_shift_total(model, grid, problem, day, &[shift_id]);
                post_exactly(model, rule.weight, payload.hard, n_d, n, &mut out);
            }
        }
    }

    if payload.on_closed_days {
        if let Some(n) = payload.night_shift_count {
            let night_ids: Vec<_> = problem
                .catalog
                .night_shifts()
                .iter()
                .copied()
                .filter(|&id| grid.contains(id))
                .collect();
            for &day in &problem.closed_days {
                let n_d = day_shift_total(model, grid, problem, day, &night_ids);
                post_exactly(model, rule.weight, payload.hard, n_d, n, &mut out);
            }
        }
    }

    out
}

/// `Σ_s worksome[s,d]` where `worksome[s,d] := ¬(x[s,d,·∈exclude])`.
fn day_worksome_total(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    day: u32,
    exclude_ids: &[ShiftId],
) -> VarId {
    let indicators: Vec<_> = (0..problem.num_staff())
        .map(|staff_idx| worksome_indicator(model, grid, staff_idx, day, exclude_ids))
        .collect();
    model.sum(&indicators)
}

fn worksome_indicator(model: &mut Model, grid: &VariableGrid, staff_idx: usize, day: u32, exclude_ids: &[ShiftId]) -> VarId {
    let excluded_vars: Vec<_> = exclude_ids
        .iter()
        .filter_map(|&id| grid.var(staff_idx, day, id))
        .collect();
    if excluded_vars.is_empty() {
        return model.int(1, 1);
    }
    let excluded = model.bool();
    let mut coeffs = vec![1; excluded_vars.len()];
    coeffs.push(-1);
    let mut vars = excluded_vars;
    vars.push(excluded);
    model.bool_lin_eq(&coeffs, &vars, 0);
    model.bool_not(excluded)
}

/// `Σ_s x[s,d,k]` over the given shifts `k`.
fn day_shift_total(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, day: u32, shift_ids: &[ShiftId]) -> VarId {
    let vars: Vec<_> = (0..problem.num_staff())
        .flat_map(|staff_idx| shift_ids.iter().filter_map(move |&id| grid.var(staff_idx, day, id)))
        .collect();
    if vars.is_empty() {
        return model.int(0, 0);
    }
    model.sum(&vars)
}

fn post_at_least(model: &mut Model, weight: u32, hard: bool, total: VarId, min: u32, out: &mut CompileOutput) {
    if hard {
        model.int_lin_le(&[-1], &[total], -(min as i32));
        return;
    }
    let slack = model.int(0, min as i32);
    model.int_lin_le(&[-1, -1], &[total, slack], -(min as i32));
    push_scaled(model, out, weight, slack);
}

fn post_exactly(model: &mut Model, weight: u32, hard: bool, total: VarId, target: u32, out: &mut CompileOutput) {
    if hard {
        model.int_lin_eq(&[1], &[total], target as i32);
        return;
    }
    let target_var = model.int(target as i32, target as i32);
    let diff = model.sub(total, target_var);
    let abs_diff = model.abs(diff);
    push_scaled(model, out, weight, abs_diff);
}

fn push_scaled(model: &mut Model, out: &mut CompileOutput, weight: u32, term: VarId) {
    if weight == 0 {
        return;
    }
    let scale = model.int(weight as i32, weight as i32);
    out.objective_terms.push(model.mul(term, scale));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ProblemInput;
    use crate::domain::staff::StaffRecord;
    use std::collections::HashSet;

    #[test]
    fn empty_payload_is_skipped() {
        let problem = SchedulingProblem::build(ProblemInput {
            num_days: 1,
            staff: vec![StaffRecord::new("A", 0, HashSet::new())],
            day_shifts: vec!["D1".into()],
            ..Default::default()
        })
        .unwrap();
        let mut model = Model::default();
        let grid = VariableGrid::build(&mut model, 1, 1, &problem.catalog.full_alphabet());
        let rule = RuleNode {
            id: "cov".into(),
            enabled: true,
            weight: 1000,
            priority: 0,
            kind: crate::domain::rule::RuleKind::Coverage(CoveragePayload::default()),
            descriptions: Default::default(),
        };
        let out = compile(&mut model, &grid, &problem, &rule, &CoveragePayload::default());
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn exactly_per_day_hard_posts_without_skip() {
        let problem = SchedulingProblem::build(ProblemInput {
            num_days: 2,
            staff: vec![
                StaffRecord::new("A", 0, HashSet::from(["L1".to_string()])),
                StaffRecord::new("B", 0, HashSet::from(["L1".to_string()])),
            ],
            day_shifts: vec!["L1".into()],
            ..Default::default()
        })
        .unwrap();
        let mut model = Model::default();
        let grid = VariableGrid::build(&mut model, 2, 2, &problem.catalog.full_alphabet());
        let payload = CoveragePayload {
            hard: true,
            shift_code: Some("L1".into()),
            exactly_per_day: Some(1),
            ..Default::default()
        };
        let rule = RuleNode {
            id: "cov".into(),
            enabled: true,
            weight: 0,
            priority: 0,
            kind: crate::domain::rule::RuleKind::Coverage(payload.clone()),
            descriptions: Default::default(),
        };
        let out = compile(&mut model, &grid, &problem, &rule, &payload);
        assert!(out.skipped.is_empty());
    }
}
