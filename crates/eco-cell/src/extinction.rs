//! The extinction sweep.
//!
//! Removes every cohort whose abundance has fallen to (or below) the
//! extinction threshold or whose body mass is zero.  The dead cohort's whole
//! biomass — body plus reproductive potential, times abundance — is deposited
//! into the cell's organic-matter pool before removal, so mass is relocated,
//! never destroyed.
//!
//! The sweep is idempotent: running it twice with no intervening ecology is a
//! no-op, because nothing that survives the first pass qualifies for the
//! second.

use eco_core::CellId;
use eco_ecology::ProcessTracker;
use eco_grid::Cell;

use crate::CellResult;

/// Sweep `cell`, returning the number of cohorts removed.
pub fn extinction_sweep(
    cell_id:   CellId,
    cell:      &mut Cell,
    threshold: f64,
    tracker:   &dyn ProcessTracker,
) -> CellResult<u64> {
    let mut removed = 0u64;
    let mut mass_to_pool = 0.0;

    for list in &mut cell.cohorts {
        let mut i = 0;
        while i < list.len() {
            let dead = list[i].abundance <= threshold || list[i].body_mass == 0.0;
            if !dead {
                i += 1;
                continue;
            }

            // `remove` (not `swap_remove`): survivors keep their relative
            // order, which compaction tie-breaks and next timestep's
            // permutation resolution depend on.
            let cohort = list.remove(i);
            mass_to_pool += cohort.total_biomass();
            removed += 1;

            tracker.record_extinction(cell_id, cohort.merged, &cohort.lineage);
            if !cohort.merged {
                if let Some(&id) = cohort.lineage.iter().next() {
                    tracker.output_mortality_profile(id);
                }
            }
        }
    }

    if removed > 0 {
        cell.deposit_organic_mass(mass_to_pool)?;
    }
    Ok(removed)
}
