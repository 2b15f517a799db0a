//! `forbidden` kind: payload lives directly in `problem.forbidden` rather
//! than on the rule node (spec §4.2). Enabling this rule forces every
//! declared `(staff, day, shift)` triple to zero. Always hard.

use selen::prelude::Model;

use crate::domain::problem::SchedulingProblem;
use crate::rules::{force_zero, CompileOutput};
use crate::variables::VariableGrid;

pub fn compile(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem) -> CompileOutput {
    for (&(staff_idx, day), shifts) in &problem.forbidden {
        for &shift_id in shifts {
            if let Some(var) = grid.var(staff_idx, day, shift_id) {
                force_zero(model, var);
            }
        }
    }
    CompileOutput::default()
}
