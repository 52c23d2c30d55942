//! Per-timestep execution of the within-cell engine over all cells.
//!
//! # Execution model
//!
//! Without the `parallel` feature, one worker visits every cell in list
//! order.  With it, Rayon workers each take a disjoint cell subset; every
//! worker folds its cells into a private [`TimestepDiagnostics`], and the
//! per-worker accumulators are reduced exactly once per timestep.  Both paths
//! produce identical results: per-cell RNGs are seeded from `(seed, cell,
//! timestep)`, never from worker identity, and cohort IDs come from the
//! shared atomic source.
//!
//! The realm filter restricts which cells are visited without changing how
//! results aggregate.

use eco_cell::{run_cell, EngineSettings};
use eco_core::{CellId, CellRng, CohortIdSource, RealmFilter, Timestep};
use eco_ecology::{EcologyModel, ProcessTracker};
use eco_grid::{Cell, PopulationGrid};
use eco_groups::FunctionalGroupDefinitions;

use crate::{SimResult, TimestepDiagnostics};

/// Run the ecology phase for one timestep over every cell `filter` admits.
#[allow(clippy::too_many_arguments)]
pub fn run_timestep(
    grid:     &mut PopulationGrid,
    ecology:  &dyn EcologyModel,
    groups:   &FunctionalGroupDefinitions,
    tracker:  &dyn ProcessTracker,
    ids:      &CohortIdSource,
    settings: &EngineSettings,
    filter:   RealmFilter,
    timestep: Timestep,
    seed:     u64,
) -> SimResult<TimestepDiagnostics> {
    let process = |(index, cell): (usize, &mut Cell)| -> SimResult<TimestepDiagnostics> {
        let cell_id = CellId(index as u32);
        let mut diag = TimestepDiagnostics::default();

        // Realm decode only happens under a restricting filter, so grids
        // without a realm layer still run unfiltered.
        if filter != RealmFilter::All && !filter.matches(cell.realm()?) {
            return Ok(diag);
        }

        let mut rng = CellRng::new(seed, cell_id, timestep);
        let outcome = run_cell(
            cell_id, cell, ecology, groups, tracker, ids, settings, timestep, &mut rng,
        )?;
        diag.absorb(outcome);
        Ok(diag)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        grid.cells_mut()
            .par_iter_mut()
            .enumerate()
            .map(process)
            .try_reduce(TimestepDiagnostics::default, |mut a, b| {
                a += b;
                Ok(a)
            })
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut total = TimestepDiagnostics::default();
        for entry in grid.cells_mut().iter_mut().enumerate() {
            total += process(entry)?;
        }
        Ok(total)
    }
}
