//! The output-driver trait the run loop reports into.

use eco_core::Timestep;

use crate::{ModelState, TimestepDiagnostics};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the timestep loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Methods return nothing; fallible
/// backends store their first error internally and expose it after the run
/// (see `CsvDiagnosticsWriter` in `eco-output`).
///
/// # Call order per timestep
///
/// `record_diagnostics` → `end_timestep` → `save_timestep` → (at year
/// boundaries) `end_year`.  After the final timestep — or on cancellation —
/// `end_run` is called exactly once.  Diagnostics are reported even for a
/// timestep whose dispersal was cancelled, so partial progress stays
/// observable.
pub trait OutputDriver {
    /// Per-timestep extinct/produced/combined/dispersed counts.
    fn record_diagnostics(&mut self, _timestep: Timestep, _diag: &TimestepDiagnostics) {}

    /// A full-state snapshot for the completed timestep.
    fn end_timestep(&mut self, _timestep: Timestep, _state: &ModelState) {}

    /// Persist whatever `end_timestep` staged.
    fn save_timestep(&mut self, _timestep: Timestep) {}

    /// A model year has completed.  May return an opaque artifact handle
    /// (e.g. a file path) for the host to collect.
    fn end_year(&mut self, _year: u64) -> Option<String> {
        None
    }

    /// The run is over (completed or cancelled).  Called exactly once.
    fn end_run(&mut self) {}
}

/// An [`OutputDriver`] that does nothing.  Use when you need to call `run`
/// but don't want any output.
pub struct NoopOutput;

impl OutputDriver for NoopOutput {}
