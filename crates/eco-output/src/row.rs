//! Plain data row types written by output backends.

use eco_core::Timestep;
use eco_sim::TimestepDiagnostics;

/// One timestep's diagnostic counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsRow {
    pub timestep:     u64,
    pub extinctions:  u64,
    pub productions:  u64,
    pub combinations: u64,
    pub dispersals:   u64,
}

impl DiagnosticsRow {
    pub fn new(timestep: Timestep, diag: &TimestepDiagnostics) -> Self {
        Self {
            timestep:     timestep.0,
            extinctions:  diag.extinctions,
            productions:  diag.productions,
            combinations: diag.combinations,
            dispersals:   diag.dispersals,
        }
    }
}
