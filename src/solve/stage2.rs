//! Stage-2 driver (spec §4.4): full alphabet `A₂ = day_shifts ∪
//! night_shifts ∪ {OFF, PUB_OFF}`, Stage-1 cells and `fixed_cells` pinned
//! via equality, full rule compiler, plus three default-on Stage-2 terms.

use selen::prelude::{Model, SolverConfig as SelenConfig, VarId};

use crate::domain::assignment::Assignment;
use crate::domain::problem::SchedulingProblem;
use crate::error::RuleSkipped;
use crate::rules::{compile_rules, force_one};
use crate::variables::VariableGrid;

pub const DEFAULT_DAY_REQUEST_WEIGHT: u32 = 40_000;
/// Underspecified in spec §4.4 ("day-shift balance", no literal weight);
/// this implementation reuses the Stage-1 night-balance scale (§4.3) since
/// both are default-on per-staff evenness nudges of the same character.
/// Recorded in `DESIGN.md`.
pub const DEFAULT_DAY_BALANCE_WEIGHT: u32 = 20_000;
/// Likewise underspecified for the always-on minimum-coverage-of-3 term.
pub const DEFAULT_MIN_COVERAGE_WEIGHT: u32 = 10_000;
pub const DEFAULT_MIN_COVERAGE: u32 = 3;

pub struct Stage2Model {
    pub model: Model,
    pub grid: VariableGrid,
    pub objective_terms: Vec<VarId>,
    pub skipped: Vec<RuleSkipped>,
}

pub fn build(problem: &SchedulingProblem, stage1_assignment: &Assignment, max_time_seconds: u64) -> Stage2Model {
    tracing::debug!("stage-2: building model for {} staff over {} days", problem.num_staff(), problem.num_days);
    let selen_config = SelenConfig::default().with_timeout_ms(max_time_seconds.saturating_mul(1000));
    let mut model = Model::with_config(selen_config);

    let alphabet = problem.catalog.full_alphabet();
    let grid = VariableGrid::build(&mut model, problem.num_staff(), problem.num_days, &alphabet);

    pin_stage1_cells(&mut model, &grid, problem, stage1_assignment);
    pin_fixed_cells(&mut model, &grid, problem);

    let compiled = compile_rules(&mut model, &grid, problem, &problem.rules);
    let mut objective_terms = compiled.objective_terms;

    post_day_shift_request_soft(&mut model, &grid, problem, &mut objective_terms);
    post_day_shift_balance_soft(&mut model, &grid, problem, &mut objective_terms);
    post_min_daily_coverage_soft(&mut model, &grid, problem, &mut objective_terms);

    tracing::debug!(
        "stage-2: model built with {} objective terms, {} rules skipped",
        objective_terms.len(),
        compiled.skipped.len()
    );

    Stage2Model {
        model,
        grid,
        objective_terms,
        skipped: compiled.skipped,
    }
}

fn pin_stage1_cells(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, stage1: &Assignment) {
    for staff_idx in 0..problem.num_staff() {
        for day in 1..=problem.num_days {
            let shift = stage1.get(staff_idx, day);
            if let Some(var) = grid.var(staff_idx, day, shift) {
                force_one(model, var);
            }
        }
    }
}

fn pin_fixed_cells(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem) {
    for (&(staff_idx, day), &shift) in &problem.fixed_cells {
        if let Some(var) = grid.var(staff_idx, day, shift) {
            force_one(model, var);
        }
    }
}

fn post_day_shift_request_soft(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, terms: &mut Vec<VarId>) {
    for (&(staff_idx, day), &shift) in &problem.requests {
        if !problem.catalog.day_shifts().contains(&shift) {
            continue;
        }
        let Some(x_var) = grid.var(staff_idx, day, shift) else {
            continue;
        };
        let miss = model.bool_not(x_var);
        push_weighted(model, terms, DEFAULT_DAY_REQUEST_WEIGHT, miss);
    }
}

fn post_day_shift_balance_soft(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, terms: &mut Vec<VarId>) {
    let day_ids = problem.catalog.day_shifts();
    if day_ids.is_empty() || problem.num_staff() == 0 {
        return;
    }

    let counts: Vec<VarId> = (0..problem.num_staff())
        .map(|staff_idx| {
            let cells: Vec<_> = (1..=problem.num_days)
                .flat_map(|day| day_ids.iter().filter_map(move |&id| grid.var(staff_idx, day, id)))
                .collect();
            model.sum(&cells)
        })
        .collect();

    let n = counts.len() as i32;
    let total = model.sum(&counts);
    let n_const = model.int(n, n);
    let per_staff_weight = DEFAULT_DAY_BALANCE_WEIGHT / counts.len() as u32;

    for &c in &counts {
        let scaled = model.mul(c, n_const);
        let diff = model.sub(scaled, total);
        let abs_diff = model.abs(diff);
        push_weighted(model, terms, per_staff_weight, abs_diff);
    }
}

fn post_min_daily_coverage_soft(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, terms: &mut Vec<VarId>) {
    let off = problem.catalog.off();
    let pub_off = problem.catalog.pub_off();

    for day in 1..=problem.num_days {
        if problem.closed_days.contains(&day) {
            continue;
        }
        let work_vars: Vec<_> = (0..problem.num_staff())
            .map(|staff_idx| crate::rules::rolling_window::work_indicator(model, grid, staff_idx, day, off, pub_off))
            .collect();
        if work_vars.is_empty() {
            continue;
        }
        let work_d = model.sum(&work_vars);
        let slack = model.int(0, DEFAULT_MIN_COVERAGE as i32);
        model.int_lin_le(&[-1, -1], &[work_d, slack], -(DEFAULT_MIN_COVERAGE as i32));
        push_weighted(model, terms, DEFAULT_MIN_COVERAGE_WEIGHT, slack);
    }
}

fn push_weighted(model: &mut Model, terms: &mut Vec<VarId>, weight: u32, term: VarId) {
    if weight == 0 {
        return;
    }
    let scale = model.int(weight as i32, weight as i32);
    terms.push(model.mul(term, scale));
}
