//! `rolling_window` kind: caps non-off days inside every window of length
//! `max_consecutive_work_days + 1`. Always hard (spec §4.2).

use selen::prelude::Model;

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{RollingWindowPayload, RuleNode};
use crate::rules::CompileOutput;
use crate::variables::VariableGrid;

pub fn compile(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    _rule: &RuleNode,
    payload: &RollingWindowPayload,
) -> CompileOutput {
    let w = payload.max_consecutive_work_days;
    let window_len = w as usize + 1;
    if window_len as u32 > problem.num_days {
        return CompileOutput::default();
    }

    let off = problem.catalog.off();
    let pub_off = problem.catalog.pub_off();

    for staff_idx in 0..problem.num_staff() {
        let work_vars: Vec<_> = (1..=problem.num_days)
            .map(|day| work_indicator(model, grid, staff_idx, day, off, pub_off))
            .collect();

        for window in work_vars.windows(window_len) {
            let coeffs = vec![1; window.len()];
            model.bool_lin_le(&coeffs, window, w as i32);
        }
    }

    CompileOutput::default()
}

/// `work[s,d] := ¬(x[s,d,OFF] ∨ x[s,d,PUB_OFF])`, via a reified equality
/// (GLOSSARY — Reification).
pub(crate) fn work_indicator(
    model: &mut Model,
    grid: &VariableGrid,
    staff_idx: usize,
    day: u32,
    off: crate::domain::shift::ShiftId,
    pub_off: crate::domain::shift::ShiftId,
) -> selen::prelude::VarId {
    let is_off = off_indicator(model, grid, staff_idx, day, off, pub_off);
    model.bool_not(is_off)
}

/// `is_off[s,d] := x[s,d,OFF] ∨ x[s,d,PUB_OFF]`, reified. Since the
/// exactly-one invariant makes the two cells mutually exclusive, their sum
/// is already a valid 0/1 indicator.
pub(crate) fn off_indicator(
    model: &mut Model,
    grid: &VariableGrid,
    staff_idx: usize,
    day: u32,
    off: crate::domain::shift::ShiftId,
    pub_off: crate::domain::shift::ShiftId,
) -> selen::prelude::VarId {
    let off_var = grid
        .var(staff_idx, day, off)
        .expect("OFF is always present in every stage alphabet");
    let pub_off_var = grid
        .var(staff_idx, day, pub_off)
        .expect("PUB_OFF is always present in every stage alphabet");
    let is_off = model.bool();
    model.bool_lin_eq(&[1, 1, -1], &[off_var, pub_off_var, is_off], 0);
    is_off
}
