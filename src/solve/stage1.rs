//! Stage-1 driver (spec §4.3): restricted alphabet `A₁ = night_shifts ∪
//! {L1, OFF, PUB_OFF}`, full rule compiler, plus three default-on safety
//! terms so a Stage-1 solve is well-formed even with an empty rule catalog.

use selen::prelude::{Model, SolverConfig as SelenConfig, VarId};

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::SKILL_NIGHT;
use crate::error::RuleSkipped;
use crate::rules::compile_rules;
use crate::variables::VariableGrid;

pub const DEFAULT_L1_PER_DAY_WEIGHT: u32 = 35_000;
pub const DEFAULT_NIGHT_BALANCE_WEIGHT: u32 = 20_000;

/// Output of building the Stage-1 model: the model itself (ready to
/// `minimize`), the grid it was built over, and compiler diagnostics.
pub struct Stage1Model {
    pub model: Model,
    pub grid: VariableGrid,
    pub objective_terms: Vec<VarId>,
    pub skipped: Vec<RuleSkipped>,
}

pub fn build(problem: &SchedulingProblem, max_time_seconds: u64) -> Stage1Model {
    tracing::debug!("stage-1: building model for {} staff over {} days", problem.num_staff(), problem.num_days);
    let selen_config = SelenConfig::default().with_timeout_ms(max_time_seconds.saturating_mul(1000));
    let mut model = Model::with_config(selen_config);

    let alphabet = problem.catalog.stage1_alphabet();
    let grid = VariableGrid::build(&mut model, problem.num_staff(), problem.num_days, &alphabet);

    let compiled = compile_rules(&mut model, &grid, problem, &problem.rules);
    let mut objective_terms = compiled.objective_terms;

    post_night_then_off(&mut model, &grid, problem);
    post_prev_history_carry_over(&mut model, &grid, problem);
    post_l1_per_day_soft(&mut model, &grid, problem, &mut objective_terms);
    post_night_balance_soft(&mut model, &grid, problem, &mut objective_terms);

    tracing::debug!(
        "stage-1: model built with {} objective terms, {} rules skipped",
        objective_terms.len(),
        compiled.skipped.len()
    );

    Stage1Model {
        model,
        grid,
        objective_terms,
        skipped: compiled.skipped,
    }
}

/// Default-on safety rule: a night shift on day `d` forces `OFF` on day
/// `d + 1`, independent of any user `sequence` rule (spec §4.3).
fn post_night_then_off(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem) {
    let off = problem.catalog.off();
    for staff_idx in 0..problem.num_staff() {
        for day in 1..problem.num_days {
            let Some(off_next) = grid.var(staff_idx, day + 1, off) else {
                continue;
            };
            for &night_id in problem.catalog.night_shifts() {
                let Some(x_var) = grid.var(staff_idx, day, night_id) else {
                    continue;
                };
                // x_var <= off_next  (x_var == 1 forces off_next == 1)
                model.int_lin_le(&[1, -1], &[x_var, off_next], 0);
            }
        }
    }
}

/// Carries the last worked night or a closing work streak from outside the
/// horizon into day 1. The data model keeps only a 3-entry `prev_history`
/// (spec §9), so "≥5 consecutive worked days" is approximated here as "all
/// 3 recorded days were worked" — the strongest signal the retained history
/// can express.
fn post_prev_history_carry_over(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem) {
    let off = problem.catalog.off();
    for (staff_idx, history) in problem.prev_history.iter().enumerate() {
        let last_day = history[2];
        let was_night = problem.catalog.night_shifts().contains(&last_day);
        let closing_streak = history.iter().all(|&code| !problem.catalog.off_like(code));
        if !was_night && !closing_streak {
            continue;
        }
        if let Some(off_var) = grid.var(staff_idx, 1, off) {
            crate::rules::force_one(model, off_var);
        }
    }
}

/// Soft nudge toward exactly one `L1` assignment per day, active only when
/// `L1` actually participates in the Stage-1 alphabet.
fn post_l1_per_day_soft(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, terms: &mut Vec<VarId>) {
    let Some(l1) = problem.catalog.id_of(crate::domain::rule::SKILL_L1).filter(|&id| grid.contains(id)) else {
        return;
    };
    for day in 1..=problem.num_days {
        let vars: Vec<_> = (0..problem.num_staff())
            .filter_map(|staff_idx| grid.var(staff_idx, day, l1))
            .collect();
        if vars.is_empty() {
            continue;
        }
        let n_d = model.sum(&vars);
        let target = model.int(1, 1);
        let diff = model.sub(n_d, target);
        let abs_diff = model.abs(diff);
        push_weighted(model, terms, DEFAULT_L1_PER_DAY_WEIGHT, abs_diff);
    }
}

/// Soft nudge toward an even night-shift count across staff holding the
/// `NIGHT` skill (or all staff, if none are tagged), in the `c[s]·|E| −
/// Σc` form of spec §4.2's `balance_shifts`.
fn post_night_balance_soft(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, terms: &mut Vec<VarId>) {
    let night_ids: Vec<_> = problem.catalog.night_shifts().to_vec();
    if night_ids.is_empty() {
        return;
    }

    let group: Vec<usize> = {
        let tagged: Vec<usize> = problem
            .staff
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_skill(SKILL_NIGHT))
            .map(|(idx, _)| idx)
            .collect();
        if tagged.is_empty() {
            (0..problem.num_staff()).collect()
        } else {
            tagged
        }
    };
    if group.is_empty() {
        return;
    }

    let counts: Vec<VarId> = group
        .iter()
        .map(|&staff_idx| {
            let cells: Vec<_> = (1..=problem.num_days)
                .flat_map(|day| night_ids.iter().filter_map(move |&id| grid.var(staff_idx, day, id)))
                .collect();
            model.sum(&cells)
        })
        .collect();

    let n = counts.len() as i32;
    let total = model.sum(&counts);
    let n_const = model.int(n, n);
    let per_staff_weight = DEFAULT_NIGHT_BALANCE_WEIGHT / counts.len() as u32;

    for &c in &counts {
        let scaled = model.mul(c, n_const);
        let diff = model.sub(scaled, total);
        let abs_diff = model.abs(diff);
        push_weighted(model, terms, per_staff_weight, abs_diff);
    }
}

fn push_weighted(model: &mut Model, terms: &mut Vec<VarId>, weight: u32, term: VarId) {
    if weight == 0 {
        return;
    }
    let scale = model.int(weight as i32, weight as i32);
    terms.push(model.mul(term, scale));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ProblemInput;
    use crate::domain::staff::StaffRecord;
    use std::collections::HashSet;

    #[test]
    fn stage1_alphabet_excludes_plain_day_shifts() {
        let problem = SchedulingProblem::build(ProblemInput {
            num_days: 2,
            staff: vec![StaffRecord::new("A", 0, HashSet::from(["NIGHT".to_string()]))],
            day_shifts: vec!["D1".into()],
            night_shifts: vec!["Q1".into()],
            ..Default::default()
        })
        .unwrap();
        let built = build(&problem, 5);
        assert!(!built.grid.contains(problem.catalog.id_of("D1").unwrap()));
        assert!(built.grid.contains(problem.catalog.id_of("Q1").unwrap()));
    }
}
