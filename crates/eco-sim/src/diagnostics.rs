//! Diagnostic counters.
//!
//! Per-timestep counts come out of the scheduler's per-worker accumulators
//! and are summed exactly once per timestep (addition is commutative, so the
//! merge is independent of worker completion order).  The whole-run totals
//! absorb them and round-trip through the checkpoint's string-keyed map.

use std::collections::BTreeMap;

use eco_cell::CellOutcome;

// ── TimestepDiagnostics ───────────────────────────────────────────────────────

/// What one timestep did, summed over all visited cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimestepDiagnostics {
    pub extinctions:  u64,
    pub productions:  u64,
    pub combinations: u64,
    pub dispersals:   u64,
}

impl TimestepDiagnostics {
    /// Fold one cell's outcome into this accumulator.
    #[inline]
    pub fn absorb(&mut self, outcome: CellOutcome) {
        self.extinctions += outcome.extinctions;
        self.productions += outcome.productions;
        self.combinations += outcome.combinations;
    }
}

impl std::ops::AddAssign for TimestepDiagnostics {
    fn add_assign(&mut self, rhs: TimestepDiagnostics) {
        self.extinctions += rhs.extinctions;
        self.productions += rhs.productions;
        self.combinations += rhs.combinations;
        self.dispersals += rhs.dispersals;
    }
}

// ── GlobalDiagnostics ─────────────────────────────────────────────────────────

/// Whole-run counters carried in every checkpoint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalDiagnostics {
    pub cohorts_extinct:   u64,
    pub cohorts_produced:  u64,
    pub cohorts_combined:  u64,
    pub cohorts_dispersed: u64,
}

/// Checkpoint map keys.  Stable names: renaming them breaks resume.
const KEY_EXTINCT: &str = "cohorts extinct";
const KEY_PRODUCED: &str = "cohorts produced";
const KEY_COMBINED: &str = "cohorts combined";
const KEY_DISPERSED: &str = "cohorts dispersed";
const KEY_STOCKS: &str = "stocks in model";

impl GlobalDiagnostics {
    /// Fold a completed timestep's counts into the run totals.
    pub fn absorb(&mut self, step: TimestepDiagnostics) {
        self.cohorts_extinct += step.extinctions;
        self.cohorts_produced += step.productions;
        self.cohorts_combined += step.combinations;
        self.cohorts_dispersed += step.dispersals;
    }

    /// Flatten to the checkpoint's string-keyed map.
    ///
    /// `stocks_in_model` is derived from the grid at capture time rather
    /// than accumulated, so the caller supplies it.
    pub fn to_map(self, stocks_in_model: u64) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (KEY_EXTINCT.to_string(), self.cohorts_extinct as f64),
            (KEY_PRODUCED.to_string(), self.cohorts_produced as f64),
            (KEY_COMBINED.to_string(), self.cohorts_combined as f64),
            (KEY_DISPERSED.to_string(), self.cohorts_dispersed as f64),
            (KEY_STOCKS.to_string(), stocks_in_model as f64),
        ])
    }

    /// Rebuild the counters from a checkpoint map.  Unknown keys are
    /// ignored; missing keys read as zero.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Self {
        let read = |key: &str| map.get(key).copied().unwrap_or(0.0) as u64;
        GlobalDiagnostics {
            cohorts_extinct:   read(KEY_EXTINCT),
            cohorts_produced:  read(KEY_PRODUCED),
            cohorts_combined:  read(KEY_COMBINED),
            cohorts_dispersed: read(KEY_DISPERSED),
        }
    }
}
