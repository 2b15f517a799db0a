//! K-best enumerator (spec §4.5). `selen::Model::solve`/`minimize` consume
//! `self`, so there is no persistent model to mutate between iterations;
//! instead each iteration rebuilds a fresh model via `builder` and replays
//! every no-good cut accumulated so far (spec §9's "K-best via repeated
//! solving with no-good cuts", realized as rebuild-and-replay).

use std::sync::atomic::{AtomicBool, Ordering};

use selen::prelude::{Model, SolverError, VarId};

use crate::domain::assignment::{Assignment, SolveResult, SolveStatus};
use crate::variables::VariableGrid;

/// One stage's freshly built model: variables, all constraints, the soft
/// objective terms to minimize (empty means "any feasible solution is
/// optimal"), and an optional tie-break term used only to order solutions
/// that are exactly equal on the real objective.
pub struct StageBuild {
    pub model: Model,
    pub grid: VariableGrid,
    pub objective_terms: Vec<VarId>,
    pub tie_break: Option<VarId>,
}

pub trait StageBuilder {
    fn build(&mut self) -> StageBuild;
}

impl<F> StageBuilder for F
where
    F: FnMut() -> StageBuild,
{
    fn build(&mut self) -> StageBuild {
        self()
    }
}

/// Runs up to `k_best` iterations, returning results in the order produced
/// (non-increasing in objective quality). Stops early on `Infeasible`,
/// `Unknown`, a cancelled `cancel` flag, or reaching `k_best`. When
/// `log_progress` is set, emits a `tracing::info!` event per iteration
/// (spec §2 ambient logging, gated by `SolverConfig::log_search_progress`).
pub fn run<B: StageBuilder>(mut builder: B, k_best: u8, cancel: Option<&AtomicBool>, log_progress: bool) -> Vec<SolveResult> {
    let mut results = Vec::new();
    let mut previous: Vec<Assignment> = Vec::new();

    for iteration in 0..k_best {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            if log_progress {
                tracing::info!("k-best cancelled before iteration {iteration}");
            }
            break;
        }

        let build = builder.build();
        let mut model = build.model;
        let grid = build.grid;
        for prev in &previous {
            post_no_good_cut(&mut model, &grid, prev);
        }

        let result = match build.tie_break {
            Some(tie_break) if !build.objective_terms.is_empty() => {
                solve_lexicographic(model, &grid, build.objective_terms, tie_break, &mut builder, &previous)
            }
            _ => solve_once(model, &grid, build.objective_terms, build.tie_break),
        };

        if log_progress {
            tracing::info!("k-best iteration {iteration}: status={:?} objective={:?}", result.status, result.objective);
        }

        let found = result.assignment.clone();
        let usable = result.is_usable();
        results.push(result);

        if !usable {
            break;
        }
        if let Some(assignment) = found {
            previous.push(assignment);
        }
    }

    results
}

/// Minimizes `objective_terms` alone (optionally folding in `tie_break`
/// when there is no real objective to dominate it — safe to add directly
/// since `tie_break` is bounded far below any real rule weight).
fn solve_once(mut model: Model, grid: &VariableGrid, objective_terms: Vec<VarId>, tie_break: Option<VarId>) -> SolveResult {
    let mut terms = objective_terms;
    if let Some(tie_break) = tie_break {
        terms.push(tie_break);
    }
    let objective_var = (!terms.is_empty()).then(|| model.sum(&terms));
    let outcome = match objective_var {
        Some(obj) => model.minimize(obj),
        None => model.solve(),
    };

    match outcome {
        Ok(solution) => {
            let objective = objective_var.and_then(|v| solution[v].as_int()).map(i64::from);
            let assignment = crate::solve::extractor::extract_assignment(&solution, grid);
            SolveResult {
                status: SolveStatus::Optimal,
                objective,
                assignment: Some(assignment),
                summary: None,
            }
        }
        Err(SolverError::NoSolution { .. }) => SolveResult::empty(SolveStatus::Infeasible),
        Err(_) => SolveResult::empty(SolveStatus::Unknown),
    }
}

/// Breaks ties among equal-cost optima without ever multiplying the real
/// objective by a scaling constant (see `DESIGN.md`'s tie-break Open
/// Question — an earlier multiplicative encoding overflowed `i32` once the
/// rule-weighted sum left small values). Phase 1 finds the true optimum `V`
/// of `objective_terms` on a throwaway model; phase 2 rebuilds fresh,
/// replays the same no-good cuts, hard-pins the objective to `== V`, and
/// minimizes only `tie_break` among the solutions that already achieve it.
fn solve_lexicographic<B: StageBuilder>(
    mut model: Model,
    grid: &VariableGrid,
    objective_terms: Vec<VarId>,
    tie_break: VarId,
    builder: &mut B,
    previous: &[Assignment],
) -> SolveResult {
    let primary_obj = model.sum(&objective_terms);
    let primary_value = match model.minimize(primary_obj) {
        Ok(solution) => solution[primary_obj].as_int(),
        Err(SolverError::NoSolution { .. }) => return SolveResult::empty(SolveStatus::Infeasible),
        Err(_) => return SolveResult::empty(SolveStatus::Unknown),
    };
    let Some(primary_value) = primary_value else {
        return SolveResult::empty(SolveStatus::Unknown);
    };

    let second = builder.build();
    let tie_break_id = tie_break_var(&second);
    let mut model = second.model;
    let grid = &second.grid;
    for prev in previous {
        post_no_good_cut(&mut model, grid, prev);
    }
    let coeffs = vec![1; second.objective_terms.len()];
    model.int_lin_eq(&coeffs, &second.objective_terms, primary_value);

    match model.minimize(tie_break_id) {
        Ok(solution) => {
            let assignment = crate::solve::extractor::extract_assignment(&solution, grid);
            SolveResult {
                status: SolveStatus::Optimal,
                objective: Some(i64::from(primary_value)),
                assignment: Some(assignment),
                summary: None,
            }
        }
        Err(SolverError::NoSolution { .. }) => SolveResult::empty(SolveStatus::Infeasible),
        Err(_) => SolveResult::empty(SolveStatus::Unknown),
    }
}

fn tie_break_var(build: &StageBuild) -> VarId {
    build.tie_break.expect("solve_lexicographic only runs when tie_break is Some")
}

/// Forbids the exact assignment just found: `∨_{s,d} ¬x[s,d,prev[s,d]]`
/// (spec §4.5 — the cut is global over the current stage's alphabet).
fn post_no_good_cut(model: &mut Model, grid: &VariableGrid, prev: &Assignment) {
    let mut literals = Vec::with_capacity(prev.num_staff() * prev.num_days());
    for staff_idx in 0..prev.num_staff() {
        for day in 1..=prev.num_days() as u32 {
            if let Some(var) = grid.var(staff_idx, day, prev.get(staff_idx, day)) {
                literals.push(var);
            }
        }
    }
    if literals.is_empty() {
        return;
    }
    model.bool_clause(&[], &literals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shift::ShiftId;

    #[test]
    fn no_cut_is_posted_for_an_empty_previous_list() {
        // A bare sanity check that posting zero cuts does not panic; the
        // enumerator itself is exercised end-to-end in the integration
        // suite against the public Orchestrator API.
        let mut model = Model::default();
        let alphabet = vec![ShiftId(0), ShiftId(1)];
        let grid = VariableGrid::build(&mut model, 1, 1, &alphabet);
        let off = crate::domain::assignment::Assignment::filled(1, 1, ShiftId(0));
        post_no_good_cut(&mut model, &grid, &off);
    }
}
