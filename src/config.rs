//! Solver configuration, carried explicitly through every `Orchestrator`
//! call instead of living in process-wide mutable state (REDESIGN FLAGS).

/// Recognized configuration knobs (spec §6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Per-iteration time budget for the underlying solver.
    pub max_time_seconds: u64,
    /// Number of distinct assignments to enumerate, in `[1, 8]`.
    pub k_best: u8,
    /// Optional seed influencing tie-break ordering (see `DESIGN.md`).
    pub seed: Option<u64>,
    /// Emit a `tracing` event per K-best iteration when set.
    pub log_search_progress: bool,
}

pub const MAX_K_BEST: u8 = 8;
pub const DEFAULT_MAX_TIME_SECONDS: u64 = 60;
pub const DEFAULT_K_BEST: u8 = 3;

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_time_seconds: DEFAULT_MAX_TIME_SECONDS,
            k_best: DEFAULT_K_BEST,
            seed: None,
            log_search_progress: false,
        }
    }
}

impl SolverConfig {
    /// Clamps `k_best` into the documented `[1, 8]` range.
    pub fn normalized(mut self) -> Self {
        self.k_best = self.k_best.clamp(1, MAX_K_BEST);
        self
    }
}
