//! The per-cell processing pass.

use eco_core::{CellId, CellRng, CohortIdSource, Timestep};
use eco_ecology::{EcologyModel, ProcessTracker};
use eco_grid::{Cell, Cohort};
use eco_groups::FunctionalGroupDefinitions;

use crate::compactor::{compact_cohorts, MergeTolerance};
use crate::extinction::extinction_sweep;
use crate::ordering::{action_order, OrderingPolicy};
use crate::{CellResult, EngineError};

// ── EngineSettings ────────────────────────────────────────────────────────────

/// Knobs for the within-cell pass, fixed for the length of a run.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Abundance at or below which a cohort neither acts nor survives the
    /// sweep.
    pub extinction_threshold: f64,

    /// Per-cell cohort budget; exceeded counts trigger compaction.
    pub max_cohorts: usize,

    /// Merge candidacy bounds for the compactor.
    pub tolerance: MergeTolerance,

    /// How the action order is drawn.
    pub ordering: OrderingPolicy,

    /// Model time resolution, passed through to the ecology collaborator.
    pub days_per_timestep: f64,
}

// ── CellOutcome ───────────────────────────────────────────────────────────────

/// Per-cell diagnostic counts from one timestep's pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellOutcome {
    /// Cohorts removed by the extinction sweeps.
    pub extinctions: u64,
    /// Offspring cohorts appended.
    pub productions: u64,
    /// Merges performed by the compactor.
    pub combinations: u64,
}

impl std::ops::AddAssign for CellOutcome {
    fn add_assign(&mut self, rhs: CellOutcome) {
        self.extinctions += rhs.extinctions;
        self.productions += rhs.productions;
        self.combinations += rhs.combinations;
    }
}

// ── run_cell ──────────────────────────────────────────────────────────────────

/// Process one cell for one timestep.
///
/// 1. Snapshot per-group cohort counts and draw the action order over the
///    snapshot's flat index space.
/// 2. For each actor (skipping those at or below the extinction threshold),
///    invoke the ecology callback; validate the actor afterwards and append
///    any offspring with freshly allocated IDs.
/// 3. Run the extinction sweep.
/// 4. If the cohort count exceeds the budget, compact and re-sweep.
///
/// The pass runs to completion — there are no suspension points — and
/// touches nothing outside `cell` except `ids` and `tracker`, both safe for
/// concurrent use.
#[allow(clippy::too_many_arguments)]
pub fn run_cell(
    cell_id:  CellId,
    cell:     &mut Cell,
    ecology:  &dyn EcologyModel,
    groups:   &FunctionalGroupDefinitions,
    tracker:  &dyn ProcessTracker,
    ids:      &CohortIdSource,
    settings: &EngineSettings,
    timestep: Timestep,
    rng:      &mut CellRng,
) -> CellResult<CellOutcome> {
    let mut outcome = CellOutcome::default();

    ecology.initialise_for_cell(cell.area_km2()?, settings.days_per_timestep);

    // ── Snapshot and permute ──────────────────────────────────────────────
    let counts: Vec<usize> = cell.cohorts.iter().map(Vec::len).collect();
    let order = action_order(&counts, settings.ordering, timestep, rng);

    // ── Invoke ecology per actor ──────────────────────────────────────────
    //
    // Indices below the snapshot counts stay valid for the whole pass:
    // nothing is removed until the sweep, and offspring land beyond the
    // snapshot.
    for actor in order {
        let (g, i) = (actor.group.index(), actor.index);

        let maturity_before = {
            let cohort = &cell.cohorts[g][i];
            if cohort.abundance <= settings.extinction_threshold {
                continue;
            }
            cohort.maturity_timestep
        };

        let offspring =
            ecology.run_within_cell_ecology(actor, cell, groups, timestep, tracker, rng);

        // The callback is trusted with the biology but not with the
        // invariants: negative mass or abundance fails the timestep here.
        let cohort = &mut cell.cohorts[g][i];
        cohort.validate().map_err(|source| EngineError::ContractViolation {
            cell: cell_id,
            group: actor.group,
            index: i,
            source,
        })?;
        cohort.max_body_mass = cohort.max_body_mass.max(cohort.body_mass);

        if !maturity_before.is_set() && cohort.maturity_timestep.is_set() {
            tracker.track_maturity(
                cell_id,
                actor.group,
                timestep,
                cohort.birth_timestep,
                cohort.body_mass,
            );
        }

        for spec in offspring {
            spec.validate().map_err(|source| EngineError::BadOffspring {
                cell: cell_id,
                source,
            })?;
            if spec.group.index() >= cell.group_count() {
                return Err(EngineError::UnknownGroup {
                    cell:  cell_id,
                    group: spec.group,
                });
            }

            let id = ids.next();
            tracker.record_new_cohort(cell_id, spec.group, id, spec.abundance, spec.juvenile_mass);
            cell.push_cohort(spec.group, Cohort::founder(id, timestep, &spec));
            outcome.productions += 1;
        }
    }

    // ── Sweep, compact, re-sweep ──────────────────────────────────────────
    outcome.extinctions +=
        extinction_sweep(cell_id, cell, settings.extinction_threshold, tracker)?;

    if cell.cohort_count() > settings.max_cohorts {
        outcome.combinations +=
            compact_cohorts(&mut cell.cohorts, settings.max_cohorts, &settings.tolerance)?;
        outcome.extinctions +=
            extinction_sweep(cell_id, cell, settings.extinction_threshold, tracker)?;
    }

    Ok(outcome)
}
