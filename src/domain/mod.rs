//! Immutable input records and enumerations (spec §3).

pub mod assignment;
pub mod problem;
pub mod rule;
pub mod shift;
pub mod staff;

pub use assignment::{Assignment, AssignmentTable, SolveResult, SolveStatus, Stage1Result, Stage2Result};
pub use problem::{ProblemInput, SchedulingProblem};
pub use rule::{RuleKind, RuleNode};
pub use shift::{ShiftCatalog, ShiftId};
pub use staff::StaffRecord;
