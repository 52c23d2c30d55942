//! `ModelState` — the serializable full-state snapshot.
//!
//! A checkpoint carries everything needed to continue a run in another
//! process: the completed-timestep count, the global diagnostic map, every
//! cell (cohorts, stocks, environment layers), and the next-cohort-ID
//! counter.  The payload is plain `serde` data; choosing a wire format
//! (bincode, JSON, …) is the host's business.
//!
//! Capture happens at a phase boundary where the run loop holds `&mut` on the
//! grid, so no grid mutation can interleave with serialization.  States are
//! immutable once emitted; with randomness disabled, identical inputs yield
//! `PartialEq`-identical (and hence byte-identical) successor states — every
//! collection here is ordered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use eco_core::CohortIdSource;
use eco_grid::{Cell, GridShape, PopulationGrid};

use crate::{GlobalDiagnostics, SimError, SimResult};

/// Full simulation state at a timestep boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    /// Layout version for compatibility checking on resume.
    pub version: u32,

    /// Timesteps fully completed before this snapshot.
    pub timesteps_complete: u64,

    /// Whole-run diagnostic counters, string-keyed.
    pub global_diagnostics: BTreeMap<String, f64>,

    /// Grid geometry, needed to rebuild the `PopulationGrid`.
    pub shape: GridShape,

    /// Functional groups every cell is dimensioned for.
    pub group_count: usize,

    /// Whether the grid is a set of isolated study cells.
    pub fixed_point_only: bool,

    /// Every cell, row-major.
    pub cells: Vec<Cell>,

    /// The ID the next created cohort will receive.
    pub next_cohort_id: u64,
}

impl ModelState {
    /// Current snapshot layout version.
    pub const VERSION: u32 = 1;

    /// Capture the current state.  Clones the full cell collection.
    pub fn capture(
        grid:               &PopulationGrid,
        diagnostics:        GlobalDiagnostics,
        ids:                &CohortIdSource,
        timesteps_complete: u64,
    ) -> Self {
        ModelState {
            version: Self::VERSION,
            timesteps_complete,
            global_diagnostics: diagnostics.to_map(grid.total_stocks() as u64),
            shape: grid.shape,
            group_count: grid.group_count,
            fixed_point_only: grid.fixed_point_only,
            cells: grid.cells().to_vec(),
            next_cohort_id: ids.peek(),
        }
    }

    /// Split the snapshot back into live parts.
    ///
    /// Fails on a version mismatch or a cell collection inconsistent with
    /// the recorded shape.
    pub fn restore(self) -> SimResult<(PopulationGrid, GlobalDiagnostics, CohortIdSource, u64)> {
        if self.version != Self::VERSION {
            return Err(SimError::StateVersionMismatch {
                expected: Self::VERSION,
                found:    self.version,
            });
        }
        let diagnostics = GlobalDiagnostics::from_map(&self.global_diagnostics);
        let grid = PopulationGrid::from_parts(
            self.shape,
            self.group_count,
            self.fixed_point_only,
            self.cells,
        )?;
        Ok((
            grid,
            diagnostics,
            CohortIdSource::new(self.next_cohort_id),
            self.timesteps_complete,
        ))
    }
}
