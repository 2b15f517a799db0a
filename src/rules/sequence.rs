//! `sequence` kind: `after_shifts` on day `d` implies `next_day_must_be` on
//! day `d + 1`. Always hard (spec §4.2).

use selen::prelude::Model;

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{RuleNode, SequencePayload};
use crate::error::RuleSkipped;
use crate::rules::{force_zero, CompileOutput};
use crate::variables::VariableGrid;

pub fn compile(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    rule: &RuleNode,
    payload: &SequencePayload,
) -> CompileOutput {
    if payload.after_shifts.is_empty() || payload.next_day_must_be.is_empty() {
        return CompileOutput {
            skipped: vec![RuleSkipped::new(
                rule.id.clone(),
                "after_shifts and next_day_must_be must both be non-empty",
            )],
            ..Default::default()
        };
    }

    let after_ids: Vec<_> = payload
        .after_shifts
        .iter()
        .filter_map(|code| problem.catalog.id_of(code))
        .filter(|&id| grid.contains(id))
        .collect();
    let next_ids: Vec<_> = payload
        .next_day_must_be
        .iter()
        .filter_map(|code| problem.catalog.id_of(code))
        .filter(|&id| grid.contains(id))
        .collect();

    for staff_idx in 0..problem.num_staff() {
        for day in 1..problem.num_days {
            let next_day = day + 1;
            let next_vars: Vec<_> = next_ids
                .iter()
                .filter_map(|&id| grid.var(staff_idx, next_day, id))
                .collect();

            for &after_id in &after_ids {
                let Some(x_var) = grid.var(staff_idx, day, after_id) else {
                    continue;
                };
                if next_vars.is_empty() {
                    force_zero(model, x_var);
                    continue;
                }
                let mut coeffs = vec![1];
                let mut vars = vec![x_var];
                coeffs.extend(std::iter::repeat(-1).take(next_vars.len()));
                vars.extend(next_vars.iter().copied());
                model.int_lin_le(&coeffs, &vars, 0);
            }
        }
    }

    CompileOutput::default()
}
