//! `SchedulingProblem` construction: validation and interning happen once,
//! here, so nothing downstream re-parses a string or re-checks a bound
//! (spec §3, REDESIGN FLAGS).

use std::collections::{HashMap, HashSet};

use crate::domain::rule::RuleNode;
use crate::domain::shift::{ShiftCatalog, ShiftId, OFF};
use crate::domain::staff::StaffRecord;
use crate::error::SchedulerError;

/// Plain owned input accepted by [`SchedulingProblem::build`]. Shift codes
/// are given as strings here; `build` interns them against the catalog it
/// constructs from `day_shifts`/`night_shifts`.
#[derive(Debug, Clone, Default)]
pub struct ProblemInput {
    pub year: i32,
    pub month: u32,
    pub num_days: u32,
    pub staff: Vec<StaffRecord>,
    pub day_shifts: Vec<String>,
    pub night_shifts: Vec<String>,
    pub closed_days: Vec<u32>,
    /// `(staff_name, day, shift_code)`.
    pub requests: Vec<(String, u32, String)>,
    /// `(staff_name, day, shift_code)`; multiple entries for the same
    /// `(staff_name, day)` accumulate into a set.
    pub forbidden: Vec<(String, u32, String)>,
    /// `staff_name -> [d-3, d-2, d-1]`, oldest first; shorter slices are
    /// padded with `OFF` at the front, longer ones truncated to the last 3.
    pub prev_history: HashMap<String, Vec<String>>,
    /// `(staff_name, day, shift_code)`.
    pub fixed_cells: Vec<(String, u32, String)>,
    pub rules: Vec<RuleNode>,
}

/// `{year, month, num_days, staff[], day_shifts[], night_shifts[],
/// closed_days[], requests, forbidden, prev_history, fixed_cells, rules[]}`
/// (spec §3), with shift codes interned into [`ShiftId`] and staff addressed
/// by dense index instead of name.
#[derive(Debug, Clone)]
pub struct SchedulingProblem {
    pub year: i32,
    pub month: u32,
    pub num_days: u32,
    pub staff: Vec<StaffRecord>,
    pub catalog: ShiftCatalog,
    pub closed_days: HashSet<u32>,
    pub requests: HashMap<(usize, u32), ShiftId>,
    pub forbidden: HashMap<(usize, u32), HashSet<ShiftId>>,
    /// `[d-3, d-2, d-1]` per staff index, always exactly 3 entries long.
    pub prev_history: Vec<[ShiftId; 3]>,
    pub fixed_cells: HashMap<(usize, u32), ShiftId>,
    pub rules: Vec<RuleNode>,
}

impl SchedulingProblem {
    pub fn build(input: ProblemInput) -> Result<Self, SchedulerError> {
        if input.staff.is_empty() {
            return Err(SchedulerError::InvalidInput("staff list is empty".into()));
        }
        if input.num_days == 0 {
            return Err(SchedulerError::InvalidInput("num_days must be at least 1".into()));
        }

        let mut staff_index: HashMap<String, usize> = HashMap::with_capacity(input.staff.len());
        for (idx, staff) in input.staff.iter().enumerate() {
            if staff_index.insert(staff.name.clone(), idx).is_some() {
                return Err(SchedulerError::InvalidInput(format!(
                    "duplicate staff name '{}'",
                    staff.name
                )));
            }
        }

        let catalog = ShiftCatalog::build(&input.day_shifts, &input.night_shifts)
            .map_err(SchedulerError::InvalidInput)?;

        let mut closed_days = HashSet::with_capacity(input.closed_days.len());
        for day in input.closed_days {
            Self::check_day(day, input.num_days)?;
            closed_days.insert(day);
        }

        let staff_idx = |name: &str| -> Result<usize, SchedulerError> {
            staff_index
                .get(name)
                .copied()
                .ok_or_else(|| SchedulerError::InvalidInput(format!("unknown staff '{name}'")))
        };
        let shift_id = |code: &str| -> Result<ShiftId, SchedulerError> {
            catalog
                .id_of(code)
                .ok_or_else(|| SchedulerError::InvalidInput(format!("unknown shift code '{code}'")))
        };

        let mut requests = HashMap::with_capacity(input.requests.len());
        for (name, day, code) in &input.requests {
            Self::check_day(*day, input.num_days)?;
            requests.insert((staff_idx(name)?, *day), shift_id(code)?);
        }

        let mut forbidden: HashMap<(usize, u32), HashSet<ShiftId>> = HashMap::new();
        for (name, day, code) in &input.forbidden {
            Self::check_day(*day, input.num_days)?;
            forbidden
                .entry((staff_idx(name)?, *day))
                .or_default()
                .insert(shift_id(code)?);
        }

        let mut fixed_cells = HashMap::with_capacity(input.fixed_cells.len());
        for (name, day, code) in &input.fixed_cells {
            Self::check_day(*day, input.num_days)?;
            fixed_cells.insert((staff_idx(name)?, *day), shift_id(code)?);
        }

        let off = catalog.off();
        let mut prev_history = vec![[off; 3]; input.staff.len()];
        for (name, codes) in &input.prev_history {
            let idx = staff_idx(name)?;
            let mut resolved = Vec::with_capacity(codes.len());
            for code in codes {
                resolved.push(shift_id(code)?);
            }
            let tail_start = resolved.len().saturating_sub(3);
            let tail = &resolved[tail_start..];
            let mut padded = [off; 3];
            let pad = 3 - tail.len();
            padded[pad..].copy_from_slice(tail);
            prev_history[idx] = padded;
        }

        Ok(Self {
            year: input.year,
            month: input.month,
            num_days: input.num_days,
            staff: input.staff,
            catalog,
            closed_days,
            requests,
            forbidden,
            prev_history,
            fixed_cells,
            rules: input.rules,
        })
    }

    fn check_day(day: u32, num_days: u32) -> Result<(), SchedulerError> {
        if day < 1 || day > num_days {
            return Err(SchedulerError::InvalidInput(format!(
                "day {day} out of range [1, {num_days}]"
            )));
        }
        Ok(())
    }

    pub fn num_staff(&self) -> usize {
        self.staff.len()
    }
}
