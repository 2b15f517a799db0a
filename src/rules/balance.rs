//! `balance` kind: any subset of three sub-semantics may be set on one rule
//! node. Always soft (§4.2). The `balance_shifts`/`balance_weekend_work`
//! deviation formula is the literal, unnormalized `count·|E| − total` the
//! source uses (Open Question, spec §9) — preserved exactly rather than
//! divided down to a true mean.

use selen::prelude::{Model, VarId};

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{BalancePayload, RuleNode};
use crate::error::RuleSkipped;
use crate::rules::rolling_window::{off_indicator, work_indicator};
use crate::rules::preference::weekend_saturdays;
use crate::rules::CompileOutput;
use crate::variables::VariableGrid;

pub fn compile(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    rule: &RuleNode,
    payload: &BalancePayload,
) -> CompileOutput {
    let has_shifts = payload.balance_shifts.as_ref().is_some_and(|l| !l.is_empty());
    if !payload.target_off_days_field && !has_shifts && !payload.balance_weekend_work {
        return CompileOutput {
            skipped: vec![RuleSkipped::new(rule.id.clone(), "no balance sub-rule is configured")],
            ..Default::default()
        };
    }

    let mut out = CompileOutput::default();

    if payload.target_off_days_field {
        target_off_days(model, grid, problem, rule.weight, &mut out);
    }

    if has_shifts {
        balance_shifts(model, grid, problem, rule.weight, payload, &mut out);
    }

    if payload.balance_weekend_work {
        balance_weekend_work(model, grid, problem, rule.weight, &mut out);
    }

    out
}

fn target_off_days(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    weight: u32,
    out: &mut CompileOutput,
) {
    let off = problem.catalog.off();
    let pub_off = problem.catalog.pub_off();

    for (staff_idx, staff) in problem.staff.iter().enumerate() {
        let indicators: Vec<_> = (1..=problem.num_days)
            .map(|day| off_indicator(model, grid, staff_idx, day, off, pub_off))
            .collect();
        let off_total = model.sum(&indicators);
        let target = model.int(staff.target_off as i32, staff.target_off as i32);
        let diff = model.sub(off_total, target);
        let abs_diff = model.abs(diff);
        push_scaled(model, out, weight, abs_diff);
    }
}

fn balance_shifts(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    weight: u32,
    payload: &BalancePayload,
    out: &mut CompileOutput,
) {
    let shift_ids: Vec<_> = payload
        .balance_shifts
        .as_ref()
        .unwrap()
        .iter()
        .filter_map(|code| problem.catalog.id_of(code))
        .filter(|&id| grid.contains(id))
        .collect();
    if shift_ids.is_empty() {
        return;
    }

    let group: Vec<usize> = match &payload.among_staff_with_skill {
        Some(skill) => problem
            .staff
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_skill(skill))
            .map(|(idx, _)| idx)
            .collect(),
        None => (0..problem.num_staff()).collect(),
    };
    if group.is_empty() {
        return;
    }

    let counts: Vec<VarId> = group
        .iter()
        .map(|&staff_idx| staff_shift_count(model, grid, problem, staff_idx, &shift_ids))
        .collect();
    distribute_deviation(model, weight, &counts, out);
}

fn balance_weekend_work(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    weight: u32,
    out: &mut CompileOutput,
) {
    let off = problem.catalog.off();
    let pub_off = problem.catalog.pub_off();
    let weekend_days: Vec<u32> = weekend_saturdays(problem.year, problem.month, problem.num_days)
        .into_iter()
        .flat_map(|sat| {
            let sun = sat + 1;
            if sun <= problem.num_days {
                vec![sat, sun]
            } else {
                vec![sat]
            }
        })
        .collect();
    if weekend_days.is_empty() {
        return;
    }

    let counts: Vec<VarId> = (0..problem.num_staff())
        .map(|staff_idx| {
            let indicators: Vec<_> = weekend_days
                .iter()
                .map(|&day| work_indicator(model, grid, staff_idx, day, off, pub_off))
                .collect();
            model.sum(&indicators)
        })
        .collect();
    distribute_deviation(model, weight, &counts, out);
}

/// `c[s]·|E| − Σc` per staff, scaled by `weight / |E|` (spec §4.2, §9).
fn distribute_deviation(model: &mut Model, weight: u32, counts: &[VarId], out: &mut CompileOutput) {
    let n = counts.len();
    if n == 0 {
        return;
    }
    let total = model.sum(counts);
    let per_staff_weight = weight / n as u32;
    let n_const = model.int(n as i32, n as i32);

    for &count in counts {
        let scaled = model.mul(count, n_const);
        let diff = model.sub(scaled, total);
        let abs_diff = model.abs(diff);
        push_scaled(model, out, per_staff_weight, abs_diff);
    }
}

fn staff_shift_count(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    staff_idx: usize,
    shift_ids: &[crate::domain::shift::ShiftId],
) -> VarId {
    let mut cell_vars = Vec::new();
    for day in 1..=problem.num_days {
        for &id in shift_ids {
            if let Some(var) = grid.var(staff_idx, day, id) {
                cell_vars.push(var);
            }
        }
    }
    model.sum(&cell_vars)
}

fn push_scaled(model: &mut Model, out: &mut CompileOutput, weight: u32, term: VarId) {
    if weight == 0 {
        return;
    }
    let scale = model.int(weight as i32, weight as i32);
    out.objective_terms.push(model.mul(term, scale));
}
