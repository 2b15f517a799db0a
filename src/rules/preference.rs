//! `preference` kind: either or both sub-semantics may be set on one rule
//! node. Always soft (§4.2).

use chrono::{Datelike, NaiveDate, Weekday};
use selen::prelude::Model;

use crate::domain::problem::SchedulingProblem;
use crate::domain::rule::{PreferencePayload, RuleNode};
use crate::error::RuleSkipped;
use crate::rules::rolling_window::off_indicator;
use crate::rules::CompileOutput;
use crate::variables::VariableGrid;

pub fn compile(
    model: &mut Model,
    grid: &VariableGrid,
    problem: &SchedulingProblem,
    rule: &RuleNode,
    payload: &PreferencePayload,
) -> CompileOutput {
    if !payload.maximize_request_satisfaction && !payload.prefer_full_weekend_off_or_work {
        return CompileOutput {
            skipped: vec![RuleSkipped::new(
                rule.id.clone(),
                "neither maximize_request_satisfaction nor prefer_full_weekend_off_or_work is set",
            )],
            ..Default::default()
        };
    }

    let mut out = CompileOutput::default();

    if payload.maximize_request_satisfaction {
        for (&(staff_idx, day), &shift_id) in &problem.requests {
            let Some(x_var) = grid.var(staff_idx, day, shift_id) else {
                continue;
            };
            let miss = model.bool_not(x_var);
            push_weighted(model, &mut out, rule.weight, miss);
        }
    }

    if payload.prefer_full_weekend_off_or_work {
        let off = problem.catalog.off();
        let pub_off = problem.catalog.pub_off();
        for saturday in weekend_saturdays(problem.year, problem.month, problem.num_days) {
            let sunday = saturday + 1;
            if sunday > problem.num_days {
                continue;
            }
            for staff_idx in 0..problem.num_staff() {
                let sat_off = off_indicator(model, grid, staff_idx, saturday, off, pub_off);
                let sun_off = off_indicator(model, grid, staff_idx, sunday, off, pub_off);
                let split = model.bool();
                model.int_ne_reif(sat_off, sun_off, split);
                push_weighted(model, &mut out, rule.weight, split);
            }
        }
    }

    out
}

fn push_weighted(model: &mut Model, out: &mut CompileOutput, weight: u32, indicator: selen::prelude::VarId) {
    if weight == 0 {
        return;
    }
    let scale = model.int(weight as i32, weight as i32);
    out.objective_terms.push(model.mul(indicator, scale));
}

/// Every in-month day falling on a Saturday, per spec §4.2's
/// calendar-derived weekend pairing.
pub(crate) fn weekend_saturdays(year: i32, month: u32, num_days: u32) -> Vec<u32> {
    let mut out = Vec::new();
    for day in 1..=num_days {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        if date.weekday() == Weekday::Sat {
            out.push(day);
        }
    }
    out
}
