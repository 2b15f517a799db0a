//! Stateless orchestrator (spec §4.7): binds a [`SchedulingProblem`] and a
//! [`SolverConfig`] to the Stage-1 and Stage-2 drivers, running each through
//! the K-best enumerator and returning diagnostics alongside results.

use std::sync::atomic::AtomicBool;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use selen::prelude::{Model, VarId};

use crate::config::SolverConfig;
use crate::domain::assignment::{Assignment, Stage1Result, Stage2Result};
use crate::domain::problem::SchedulingProblem;
use crate::error::RuleSkipped;
use crate::solve::kbest::StageBuild;
use crate::solve::{kbest, stage1, stage2};
use crate::variables::VariableGrid;

/// Caps the random per-cell tie-break coefficient. The resulting term is
/// summed directly alongside (never multiplied into) the real objective, so
/// it can only ever arbitrate between otherwise-equal-cost solutions — see
/// `kbest::solve_lexicographic`, which hard-pins the real objective before
/// minimizing this term.
const TIE_BREAK_MAX_COEFF: i32 = 16;

/// One stage's K-best run plus the compiler diagnostics collected while
/// building it (spec §7 — "`RuleSkipped` is collected and returned
/// alongside the result list").
pub struct StageRun<T> {
    pub results: Vec<T>,
    pub skipped: Vec<RuleSkipped>,
}

/// Binds inputs, runs Stage-1, and (given an externally chosen assignment)
/// runs Stage-2. Holds no state between calls; every method takes the
/// config it needs as a parameter (spec §9 — no process-wide solver state).
pub struct Orchestrator;

impl Orchestrator {
    /// Runs Stage-1 (restricted alphabet) and enumerates up to
    /// `config.k_best` distinct assignments for external selection.
    pub fn solve_stage1(problem: &SchedulingProblem, config: SolverConfig, cancel: Option<&AtomicBool>) -> StageRun<Stage1Result> {
        let config = config.normalized();
        // Diagnostics depend only on the rule catalog, which is identical on
        // every rebuild; compile once here for reporting and let the K-best
        // builder below rebuild the model itself per iteration.
        let skipped = stage1::build(problem, config.max_time_seconds).skipped;

        let builder = || {
            let built = stage1::build(problem, config.max_time_seconds);
            let mut model = built.model;
            let tie_break = config.seed.map(|seed| tie_break_term(&mut model, &built.grid, problem, seed));
            StageBuild { model, grid: built.grid, objective_terms: built.objective_terms, tie_break }
        };

        let results = with_summaries(kbest::run(builder, config.k_best, cancel, config.log_search_progress), problem);
        StageRun { results, skipped }
    }

    /// Runs Stage-2 (full alphabet) against a chosen Stage-1 assignment,
    /// pinning it and any `fixed_cells`, and enumerates up to
    /// `config.k_best` distinct final assignments.
    pub fn solve_stage2(
        problem: &SchedulingProblem,
        stage1_assignment: &Assignment,
        config: SolverConfig,
        cancel: Option<&AtomicBool>,
    ) -> StageRun<Stage2Result> {
        let config = config.normalized();
        let skipped = stage2::build(problem, stage1_assignment, config.max_time_seconds).skipped;

        let builder = || {
            let built = stage2::build(problem, stage1_assignment, config.max_time_seconds);
            let mut model = built.model;
            let tie_break = config.seed.map(|seed| tie_break_term(&mut model, &built.grid, problem, seed));
            StageBuild { model, grid: built.grid, objective_terms: built.objective_terms, tie_break }
        };

        let results = with_summaries(kbest::run(builder, config.k_best, cancel, config.log_search_progress), problem);
        StageRun { results, skipped }
    }
}

/// Attaches a derived [`crate::domain::assignment::AssignmentTable`] to
/// every usable result (spec §4.6 — the extractor's second output, built
/// from the same cell values `kbest` already read back).
fn with_summaries(mut results: Vec<crate::domain::assignment::SolveResult>, problem: &SchedulingProblem) -> Vec<crate::domain::assignment::SolveResult> {
    for result in &mut results {
        if let Some(assignment) = &result.assignment {
            result.summary = Some(crate::solve::extractor::summarize(assignment, problem));
        }
    }
    results
}

/// Resolves the "how should K-best order ties among equal-cost optimal
/// solutions" Open Question: a deterministic per-cell pseudo-random term,
/// seeded from `config.seed`. `kbest::solve_lexicographic` hard-pins the
/// real objective to its optimum before minimizing this term, so it never
/// needs scaling against (or multiplying into) the real rule weights — see
/// `DESIGN.md`. No seed means no tie-break term (the solver's own default
/// search order decides).
fn tie_break_term(model: &mut Model, grid: &VariableGrid, problem: &SchedulingProblem, seed: u64) -> VarId {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut terms = Vec::new();

    for staff_idx in 0..problem.num_staff() {
        for day in 1..=problem.num_days {
            for &var in grid.cell_vars(staff_idx, day) {
                let coeff = rng.gen_range(0..TIE_BREAK_MAX_COEFF);
                if coeff == 0 {
                    continue;
                }
                let c = model.int(coeff, coeff);
                terms.push(model.mul(var, c));
            }
        }
    }

    if terms.is_empty() {
        model.int(0, 0)
    } else {
        model.sum(&terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ProblemInput;
    use crate::domain::staff::StaffRecord;
    use std::collections::HashSet;

    fn tiny_problem() -> SchedulingProblem {
        SchedulingProblem::build(ProblemInput {
            num_days: 2,
            staff: vec![StaffRecord::new("A", 1, HashSet::new())],
            day_shifts: vec!["D1".into()],
            night_shifts: vec![],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn stage1_then_stage2_round_trip_produces_usable_results() {
        let problem = tiny_problem();
        let config = SolverConfig {
            k_best: 1,
            max_time_seconds: 5,
            seed: Some(42),
            log_search_progress: false,
        };

        let stage1_run = Orchestrator::solve_stage1(&problem, config, None);
        assert_eq!(stage1_run.results.len(), 1);
        let stage1_best = stage1_run.results[0].assignment.clone().expect("stage-1 feasible");

        let stage2_run = Orchestrator::solve_stage2(&problem, &stage1_best, config, None);
        assert_eq!(stage2_run.results.len(), 1);
        assert!(stage2_run.results[0].is_usable());
    }

    #[test]
    fn cancel_before_first_iteration_yields_no_results() {
        let problem = tiny_problem();
        let config = SolverConfig::default();
        let cancelled = AtomicBool::new(true);
        let run = Orchestrator::solve_stage1(&problem, config, Some(&cancelled));
        assert!(run.results.is_empty());
    }
}
