//! Demonstrates running a full two-stage solve through the public
//! `Orchestrator` API: build a small problem, enumerate Stage-1
//! assignments, pick one, then enumerate Stage-2 assignments built on top
//! of it.
//!
//! Run with:
//! ```text
//! cargo run --example orchestrate_month
//! ```

use std::collections::HashSet;

use shift_scheduler_core::config::SolverConfig;
use shift_scheduler_core::domain::problem::{ProblemInput, SchedulingProblem};
use shift_scheduler_core::domain::rule::{BalancePayload, RollingWindowPayload, RuleKind, RuleNode};
use shift_scheduler_core::domain::staff::StaffRecord;
use shift_scheduler_core::Orchestrator;

fn main() {
    tracing_subscriber::fmt::init();

    let staff = vec![
        StaffRecord::new("alice", 8, HashSet::from(["NIGHT".to_string()])),
        StaffRecord::new("bob", 8, HashSet::from(["NIGHT".to_string()])),
        StaffRecord::new("carol", 8, HashSet::new()),
    ];

    let rules = vec![
        RuleNode {
            id: "cap-consecutive".into(),
            enabled: true,
            weight: 0,
            priority: 0,
            kind: RuleKind::RollingWindow(RollingWindowPayload {
                max_consecutive_work_days: 5,
            }),
            descriptions: Default::default(),
        },
        RuleNode {
            id: "balance-off-days".into(),
            enabled: true,
            weight: 15_000,
            priority: 1,
            kind: RuleKind::Balance(BalancePayload {
                target_off_days_field: true,
                ..Default::default()
            }),
            descriptions: Default::default(),
        },
    ];

    let input = ProblemInput {
        year: 2026,
        month: 8,
        num_days: 31,
        staff,
        day_shifts: vec!["L1".into(), "L2".into()],
        night_shifts: vec!["N1".into()],
        closed_days: vec![],
        rules,
        ..Default::default()
    };

    let problem = SchedulingProblem::build(input).expect("valid problem");
    let config = SolverConfig {
        k_best: 3,
        max_time_seconds: 20,
        seed: Some(7),
        log_search_progress: true,
    };

    let stage1 = Orchestrator::solve_stage1(&problem, config, None);
    println!("stage 1: {} candidate(s), {} rule(s) skipped", stage1.results.len(), stage1.skipped.len());
    for skipped in &stage1.skipped {
        println!("  skipped: {skipped}");
    }

    let Some(chosen) = stage1.results.first().and_then(|r| r.assignment.clone()) else {
        println!("stage 1 produced no usable assignment");
        return;
    };

    let stage2 = Orchestrator::solve_stage2(&problem, &chosen, config, None);
    println!("stage 2: {} candidate(s)", stage2.results.len());
    for (i, result) in stage2.results.iter().enumerate() {
        println!("  candidate {i}: status={:?} objective={:?}", result.status, result.objective);
    }
}
