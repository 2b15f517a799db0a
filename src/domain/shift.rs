//! Shift code catalog, interned into dense indices at construction time.
//!
//! Per the REDESIGN FLAGS, shift codes — free-form strings in the rule
//! catalog and requests — are interned once into [`ShiftId`] so the variable
//! model can key decision variables by dense integer rather than by string.

use std::collections::HashMap;

/// Reserved shift code meaning "regular rest day".
pub const OFF: &str = "OFF";
/// Reserved shift code meaning "public-holiday rest day".
pub const PUB_OFF: &str = "PUB_OFF";

/// Dense index of a shift code within a [`ShiftCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftId(pub(crate) u16);

impl ShiftId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The full, per-branch shift alphabet: ordered day shifts, ordered night
/// shifts, plus the two reserved rest codes, each interned into a
/// [`ShiftId`].
///
/// Column order in output follows insertion order (day shifts, then night
/// shifts, then `OFF`, then `PUB_OFF`) per spec §3.
#[derive(Debug, Clone)]
pub struct ShiftCatalog {
    codes: Vec<String>,
    index: HashMap<String, ShiftId>,
    day_shifts: Vec<ShiftId>,
    night_shifts: Vec<ShiftId>,
    off: ShiftId,
    pub_off: ShiftId,
}

impl ShiftCatalog {
    /// Builds a catalog from the problem's declared day and night shift
    /// lists, appending the two reserved codes last.
    ///
    /// Returns an error if a shift code is declared twice, or collides with
    /// a reserved code.
    pub fn build(day_shifts: &[String], night_shifts: &[String]) -> Result<Self, String> {
        let mut codes = Vec::with_capacity(day_shifts.len() + night_shifts.len() + 2);
        let mut index = HashMap::new();

        let mut intern = |code: &str, codes: &mut Vec<String>, index: &mut HashMap<String, ShiftId>| -> Result<ShiftId, String> {
            if let Some(&id) = index.get(code) {
                return Err(format!("duplicate shift code '{code}' (first seen as id {})", id.0));
            }
            let id = ShiftId(codes.len() as u16);
            codes.push(code.to_string());
            index.insert(code.to_string(), id);
            Ok(id)
        };

        let mut day_ids = Vec::with_capacity(day_shifts.len());
        for code in day_shifts {
            if code == OFF || code == PUB_OFF {
                return Err(format!("day shift code '{code}' collides with a reserved code"));
            }
            day_ids.push(intern(code, &mut codes, &mut index)?);
        }

        let mut night_ids = Vec::with_capacity(night_shifts.len());
        for code in night_shifts {
            if code == OFF || code == PUB_OFF {
                return Err(format!("night shift code '{code}' collides with a reserved code"));
            }
            night_ids.push(intern(code, &mut codes, &mut index)?);
        }

        let off = intern(OFF, &mut codes, &mut index)?;
        let pub_off = intern(PUB_OFF, &mut codes, &mut index)?;

        Ok(Self {
            codes,
            index,
            day_shifts: day_ids,
            night_shifts: night_ids,
            off,
            pub_off,
        })
    }

    pub fn id_of(&self, code: &str) -> Option<ShiftId> {
        self.index.get(code).copied()
    }

    pub fn code_of(&self, id: ShiftId) -> &str {
        &self.codes[id.index()]
    }

    pub fn day_shifts(&self) -> &[ShiftId] {
        &self.day_shifts
    }

    pub fn night_shifts(&self) -> &[ShiftId] {
        &self.night_shifts
    }

    pub fn off(&self) -> ShiftId {
        self.off
    }

    pub fn pub_off(&self) -> ShiftId {
        self.pub_off
    }

    /// Every interned shift code, day shifts then night shifts then the
    /// reserved codes — the full alphabet `A2` of spec §2.
    pub fn full_alphabet(&self) -> Vec<ShiftId> {
        let mut all = Vec::with_capacity(self.codes.len());
        all.extend_from_slice(&self.day_shifts);
        all.extend_from_slice(&self.night_shifts);
        all.push(self.off);
        all.push(self.pub_off);
        all
    }

    /// The restricted Stage-1 alphabet `A1 = night_shifts ∪ {L1, OFF,
    /// PUB_OFF}`. `L1` is included only if a day shift named `"L1"` is
    /// actually present in the catalog (graceful degradation rather than a
    /// hard failure, matching spec §4.2's "unknown rule is a no-op" spirit).
    pub fn stage1_alphabet(&self) -> Vec<ShiftId> {
        let mut alphabet = Vec::with_capacity(self.night_shifts.len() + 3);
        alphabet.extend_from_slice(&self.night_shifts);
        if let Some(l1) = self.id_of(crate::domain::rule::SKILL_L1) {
            if self.day_shifts.contains(&l1) {
                alphabet.push(l1);
            }
        }
        alphabet.push(self.off);
        alphabet.push(self.pub_off);
        alphabet
    }

    pub fn off_like(&self, id: ShiftId) -> bool {
        id == self.off || id == self.pub_off
    }
}
