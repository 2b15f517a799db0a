//! Result extractor (spec §4.6): reads a solved `selen::Solution` back into
//! an [`Assignment`] and, on demand, a human-facing [`AssignmentTable`] —
//! one pass over the grid, no second trip through the model.

use std::collections::HashMap;

use selen::prelude::Solution;

use crate::domain::assignment::{Assignment, AssignmentTable, DailyCoverageRow, StaffRow};
use crate::domain::problem::SchedulingProblem;
use crate::variables::VariableGrid;

/// Reads the one true literal per `(staff, day)` cell out of `solution`.
pub fn extract_assignment(solution: &Solution, grid: &VariableGrid) -> Assignment {
    let alphabet = grid.alphabet();
    let mut assignment = Assignment::filled(grid.num_staff(), grid.num_days() as usize, alphabet[0]);

    for staff_idx in 0..grid.num_staff() {
        for day in 1..=grid.num_days() {
            let cell = grid.cell_vars(staff_idx, day);
            let chosen = cell
                .iter()
                .position(|&var| solution[var].as_int() == Some(1))
                .map(|p| alphabet[p])
                .unwrap_or(alphabet[0]);
            assignment.set(staff_idx, day, chosen);
        }
    }

    assignment
}

/// Builds the per-staff and per-day summary rows described in spec §4.6,
/// from an already-extracted [`Assignment`] plus the problem it solved.
pub fn summarize(assignment: &Assignment, problem: &SchedulingProblem) -> AssignmentTable {
    let off = problem.catalog.off();
    let pub_off = problem.catalog.pub_off();

    let rows = (0..problem.num_staff())
        .map(|staff_idx| {
            let days: Vec<_> = (1..=problem.num_days).map(|day| assignment.get(staff_idx, day)).collect();
            let off_days = days.iter().filter(|&&id| id == off || id == pub_off).count() as u32;
            let work_days = days.len() as u32 - off_days;
            StaffRow {
                name: problem.staff[staff_idx].name.clone(),
                days,
                off_days,
                work_days,
            }
        })
        .collect();

    let coverage = (1..=problem.num_days)
        .map(|day| {
            let mut counts: HashMap<_, u32> = HashMap::new();
            let mut work_total = 0;
            for staff_idx in 0..problem.num_staff() {
                let id = assignment.get(staff_idx, day);
                *counts.entry(id).or_insert(0) += 1;
                if id != off && id != pub_off {
                    work_total += 1;
                }
            }
            DailyCoverageRow { day, counts, work_total }
        })
        .collect();

    AssignmentTable { rows, coverage }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ProblemInput;
    use crate::domain::staff::StaffRecord;
    use selen::prelude::Model;
    use std::collections::HashSet;

    #[test]
    fn summarize_counts_off_and_work_days() {
        let problem = SchedulingProblem::build(ProblemInput {
            num_days: 2,
            staff: vec![StaffRecord::new("A", 0, HashSet::new())],
            day_shifts: vec!["D1".into()],
            ..Default::default()
        })
        .unwrap();
        let d1 = problem.catalog.id_of("D1").unwrap();
        let off = problem.catalog.off();
        let mut assignment = Assignment::filled(1, 2, off);
        assignment.set(0, 1, d1);

        let table = summarize(&assignment, &problem);
        assert_eq!(table.rows[0].work_days, 1);
        assert_eq!(table.rows[0].off_days, 1);
        assert_eq!(table.coverage[0].work_total, 1);
        assert_eq!(table.coverage[1].work_total, 0);
    }

    #[test]
    fn extract_reads_back_the_literal_true_in_every_cell() {
        let mut model = Model::default();
        let alphabet = vec![crate::domain::shift::ShiftId(0), crate::domain::shift::ShiftId(1)];
        let grid = VariableGrid::build(&mut model, 1, 1, &alphabet);
        crate::rules::force_one(&mut model, grid.var(0, 1, alphabet[1]).unwrap());
        let solution = model.solve().unwrap();
        let assignment = extract_assignment(&solution, &grid);
        assert_eq!(assignment.get(0, 1), alphabet[1]);
    }
}
