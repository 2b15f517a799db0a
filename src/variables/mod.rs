//! The `S × D × A` Boolean decision grid (spec §4.1). A pure builder: it
//! owns the variable table for one stage and exposes index lookup by
//! `(staff_idx, day, shift_code)`. Nothing here knows about rules.

use std::collections::HashMap;

use selen::prelude::{Model, VarId};

use crate::domain::shift::ShiftId;

/// `cell[s][d][k]` is true iff staff `s` works shift `k` on day `d+1`,
/// restricted to a single stage's alphabet.
pub struct VariableGrid {
    alphabet: Vec<ShiftId>,
    pos: HashMap<ShiftId, usize>,
    num_staff: usize,
    num_days: u32,
    cells: Vec<Vec<Vec<VarId>>>,
}

impl VariableGrid {
    /// Creates `S × D × |alphabet|` boolean variables in `model` and posts
    /// the exactly-one invariant `Σ_k x[s,d,k] = 1` for every `(s, d)`.
    pub fn build(model: &mut Model, num_staff: usize, num_days: u32, alphabet: &[ShiftId]) -> Self {
        let pos: HashMap<ShiftId, usize> = alphabet
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();
        let ones = vec![1; alphabet.len()];

        let mut cells = Vec::with_capacity(num_staff);
        for _ in 0..num_staff {
            let mut days = Vec::with_capacity(num_days as usize);
            for _ in 0..num_days {
                let day_vars = model.bools(alphabet.len());
                model.bool_lin_eq(&ones, &day_vars, 1);
                days.push(day_vars);
            }
            cells.push(days);
        }

        Self {
            alphabet: alphabet.to_vec(),
            pos,
            num_staff,
            num_days,
            cells,
        }
    }

    pub fn alphabet(&self) -> &[ShiftId] {
        &self.alphabet
    }

    pub fn num_staff(&self) -> usize {
        self.num_staff
    }

    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    /// `day` is 1-based. Returns `None` if `shift` is not in this stage's
    /// alphabet.
    pub fn var(&self, staff_idx: usize, day: u32, shift: ShiftId) -> Option<VarId> {
        let p = *self.pos.get(&shift)?;
        Some(self.cells[staff_idx][day as usize - 1][p])
    }

    /// All `|alphabet|` cell variables for one `(staff, day)`, in alphabet
    /// order — used to build a no-good cut over one cell.
    pub fn cell_vars(&self, staff_idx: usize, day: u32) -> &[VarId] {
        &self.cells[staff_idx][day as usize - 1]
    }

    pub fn contains(&self, shift: ShiftId) -> bool {
        self.pos.contains_key(&shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_lookup_respects_alphabet_membership() {
        let mut model = Model::default();
        let alphabet = vec![ShiftId(0), ShiftId(1)];
        let grid = VariableGrid::build(&mut model, 2, 3, &alphabet);

        assert!(grid.var(0, 1, ShiftId(0)).is_some());
        assert!(grid.var(0, 1, ShiftId(5)).is_none());
        assert_eq!(grid.cell_vars(0, 1).len(), 2);
    }
}
