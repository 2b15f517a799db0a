//! End-to-end scenarios run against the public `Orchestrator` API (spec §8).

use std::collections::HashSet;

use shift_scheduler_core::config::SolverConfig;
use shift_scheduler_core::domain::problem::{ProblemInput, SchedulingProblem};
use shift_scheduler_core::domain::rule::{
    CoveragePayload, PreferencePayload, RollingWindowPayload, RuleKind, RuleNode,
};
use shift_scheduler_core::domain::staff::StaffRecord;
use shift_scheduler_core::Orchestrator;

fn rule(id: &str, weight: u32, kind: RuleKind) -> RuleNode {
    RuleNode {
        id: id.into(),
        enabled: true,
        weight,
        priority: 0,
        kind,
        descriptions: Default::default(),
    }
}

fn config() -> SolverConfig {
    SolverConfig {
        max_time_seconds: 10,
        k_best: 3,
        seed: Some(1),
        log_search_progress: false,
    }
}

/// Runs Stage-1 (always feasible even with an empty night/L1 alphabet —
/// every cell falls back to `OFF`/`PUB_OFF`) and feeds its top assignment
/// into Stage-2, for scenarios that only exercise day-shift behavior.
fn solve_stage2_from_scratch(problem: &SchedulingProblem, cfg: SolverConfig) -> shift_scheduler_core::solve::orchestrator::StageRun<shift_scheduler_core::domain::assignment::Stage2Result> {
    let stage1 = Orchestrator::solve_stage1(problem, cfg, None);
    let stage1_best = stage1.results[0].assignment.clone().expect("stage 1 feasible");
    Orchestrator::solve_stage2(problem, &stage1_best, cfg, None)
}

/// Scenario A — a satisfied night-shift request on day 1 forces OFF on day 2.
#[test]
fn scenario_a_night_then_off_propagation() {
    let problem = SchedulingProblem::build(ProblemInput {
        num_days: 3,
        staff: vec![StaffRecord::new("A", 0, HashSet::from(["NIGHT".to_string()]))],
        night_shifts: vec!["Q1".into()],
        requests: vec![("A".into(), 1, "Q1".into())],
        rules: vec![rule(
            "maximize-requests",
            30_000,
            RuleKind::Preference(PreferencePayload {
                maximize_request_satisfaction: true,
                ..Default::default()
            }),
        )],
        ..Default::default()
    })
    .unwrap();

    let run = Orchestrator::solve_stage1(&problem, config(), None);
    let best = &run.results[0];
    assert!(best.is_usable());
    let assignment = best.assignment.as_ref().unwrap();
    let q1 = problem.catalog.id_of("Q1").unwrap();
    let off = problem.catalog.off();
    assert_eq!(assignment.get(0, 1), q1);
    assert_eq!(assignment.get(0, 2), off);
}

/// Scenario B — a 5-day rolling cap forces at least one OFF day in a 7-day
/// horizon with no off-day target pulling the other way.
#[test]
fn scenario_b_consecutive_work_cap() {
    let problem = SchedulingProblem::build(ProblemInput {
        num_days: 7,
        staff: vec![StaffRecord::new("A", 0, HashSet::new())],
        day_shifts: vec!["D1".into()],
        rules: vec![rule(
            "cap5",
            0,
            RuleKind::RollingWindow(RollingWindowPayload {
                max_consecutive_work_days: 5,
            }),
        )],
        ..Default::default()
    })
    .unwrap();

    let run = solve_stage2_from_scratch(&problem, config());
    let best = &run.results[0];
    assert!(best.is_usable());
    let assignment = best.assignment.as_ref().unwrap();
    let off = problem.catalog.off();
    let off_days = (1..=7).filter(|&d| assignment.get(0, d) == off).count();
    assert!(off_days >= 1, "a 7-day horizon with a 5-day cap must include at least one OFF day");

    for window_start in 1..=2u32 {
        let worked = (window_start..window_start + 6).filter(|&d| assignment.get(0, d) != off).count();
        assert!(worked <= 5, "no 6-day window may be fully worked");
    }
}

/// Scenario C — a hard exactly-one-L1-per-day coverage rule is satisfied
/// exactly, across both staff members.
#[test]
fn scenario_c_exactly_one_l1_per_day() {
    let problem = SchedulingProblem::build(ProblemInput {
        num_days: 2,
        staff: vec![
            StaffRecord::new("A", 0, HashSet::from(["L1".to_string()])),
            StaffRecord::new("B", 0, HashSet::from(["L1".to_string()])),
        ],
        day_shifts: vec!["L1".into()],
        rules: vec![rule(
            "exactly-one-l1",
            0,
            RuleKind::Coverage(CoveragePayload {
                hard: true,
                shift_code: Some("L1".into()),
                exactly_per_day: Some(1),
                ..Default::default()
            }),
        )],
        ..Default::default()
    })
    .unwrap();

    let run = solve_stage2_from_scratch(&problem, config());
    let best = &run.results[0];
    assert!(best.is_usable());
    let assignment = best.assignment.as_ref().unwrap();
    let l1 = problem.catalog.id_of("L1").unwrap();

    for day in 1..=2 {
        let count = (0..2).filter(|&s| assignment.get(s, day) == l1).count();
        assert_eq!(count, 1, "day {day} must have exactly one L1 assignment");
    }
}

/// Scenario D — a skill-gated minimum-coverage rule routes the night shift
/// to the one staff member who holds the NIGHT skill.
#[test]
fn scenario_d_skill_gating() {
    let problem = SchedulingProblem::build(ProblemInput {
        num_days: 1,
        staff: vec![
            StaffRecord::new("A", 0, HashSet::new()),
            StaffRecord::new("B", 0, HashSet::from(["NIGHT".to_string()])),
        ],
        night_shifts: vec!["Q1".into()],
        rules: vec![
            rule(
                "skill-gate",
                0,
                RuleKind::SkillMatch(shift_scheduler_core::domain::rule::SkillMatchPayload {
                    shift_skill_map: std::collections::HashMap::from([("Q1".to_string(), "NIGHT".to_string())]),
                }),
            ),
            rule(
                "min-coverage",
                0,
                RuleKind::Coverage(CoveragePayload {
                    hard: true,
                    min_staff_per_day: Some(1),
                    exclude_shifts: vec!["OFF".into(), "PUB_OFF".into()],
                    ..Default::default()
                }),
            ),
        ],
        ..Default::default()
    })
    .unwrap();

    let run = Orchestrator::solve_stage1(&problem, config(), None);
    let best = &run.results[0];
    assert!(best.is_usable());
    let assignment = best.assignment.as_ref().unwrap();
    let q1 = problem.catalog.id_of("Q1").unwrap();
    assert_eq!(assignment.get(1, 1), q1, "B holds the NIGHT skill and must take Q1");
    assert_ne!(assignment.get(0, 1), q1, "A has no skills and cannot take Q1");
}

/// Scenario E — K-best enumeration yields pairwise-distinct assignments
/// with a non-decreasing objective. Two NIGHT-skilled staff and a hard
/// "someone must cover" rule leave a genuinely symmetric choice of who
/// takes the night shift — unlike a day-shift-only Stage-2, which Stage-1
/// would have already pinned down to a single value per cell (spec §3's
/// pinning invariant), so feeding it through Stage-2 would collapse every
/// candidate to the same assignment.
#[test]
fn scenario_e_k_best_distinctness() {
    let problem = SchedulingProblem::build(ProblemInput {
        num_days: 1,
        staff: vec![
            StaffRecord::new("A", 0, HashSet::from(["NIGHT".to_string()])),
            StaffRecord::new("B", 0, HashSet::from(["NIGHT".to_string()])),
        ],
        night_shifts: vec!["Q1".into()],
        rules: vec![rule(
            "min-coverage",
            0,
            RuleKind::Coverage(CoveragePayload {
                hard: true,
                min_staff_per_day: Some(1),
                exclude_shifts: vec!["OFF".into(), "PUB_OFF".into()],
                ..Default::default()
            }),
        )],
        ..Default::default()
    })
    .unwrap();

    let cfg = SolverConfig { k_best: 3, ..config() };
    let run = Orchestrator::solve_stage1(&problem, cfg, None);
    assert!(!run.results.is_empty());

    let assignments: Vec<_> = run.results.iter().filter_map(|r| r.assignment.clone()).collect();
    assert!(assignments.len() >= 2, "A and B are symmetric NIGHT candidates; K-best must surface more than one choice");
    for i in 0..assignments.len() {
        for j in (i + 1)..assignments.len() {
            assert_ne!(assignments[i], assignments[j], "K-best results must be pairwise distinct");
        }
    }

    let objectives: Vec<_> = run.results.iter().filter_map(|r| r.objective).collect();
    for pair in objectives.windows(2) {
        assert!(pair[0] <= pair[1], "K-best objective sequence must be non-decreasing");
    }
}

/// Scenario F — Stage-2 preserves the exact Stage-1 values it was built on.
#[test]
fn scenario_f_stage_pinning() {
    let problem = SchedulingProblem::build(ProblemInput {
        num_days: 2,
        staff: vec![
            StaffRecord::new("A", 0, HashSet::from(["NIGHT".to_string()])),
            StaffRecord::new("B", 0, HashSet::new()),
        ],
        day_shifts: vec!["D1".into()],
        night_shifts: vec!["Q1".into()],
        ..Default::default()
    })
    .unwrap();

    let stage1 = Orchestrator::solve_stage1(&problem, config(), None);
    let stage1_best = stage1.results[0].assignment.clone().unwrap();

    let stage2 = Orchestrator::solve_stage2(&problem, &stage1_best, config(), None);
    let stage2_best = stage2.results[0].assignment.as_ref().unwrap();

    for day in 1..=2 {
        assert_eq!(
            stage2_best.get(0, day),
            stage1_best.get(0, day),
            "stage 2 must preserve staff A's stage-1 values exactly"
        );
    }
}

/// Boundary behaviors #10-#12: a range of month lengths, empty inputs, and
/// `k_best = 1` all succeed without panicking or requiring a no-good cut.
#[test]
fn boundary_month_lengths_and_empty_inputs() {
    for num_days in [28, 29, 30, 31] {
        let problem = SchedulingProblem::build(ProblemInput {
            num_days,
            staff: vec![StaffRecord::new("A", 0, HashSet::new())],
            day_shifts: vec!["D1".into()],
            ..Default::default()
        })
        .unwrap();

        let cfg = SolverConfig { k_best: 1, ..config() };
        let run = solve_stage2_from_scratch(&problem, cfg);
        assert_eq!(run.results.len(), 1, "k_best=1 must return exactly one result for num_days={num_days}");
        assert!(run.results[0].is_usable());
    }
}
