//! The dispersal engine: phase-1 compute, phase-2 apply.

use std::collections::BTreeMap;

// Arrival matching reuses the compactor's tolerance check, scoring, and
// conservation rule, so "same mass band" means the same thing in both places.
use eco_cell::{merge_distance, merge_into, within_tolerance, MergeTolerance};
use eco_core::{CancelToken, CellId, CellRng, FunctionalGroupId, Timestep};
use eco_ecology::{CrossCellProcessTracker, DispersalRule, DispersalSummary};
use eco_grid::{Cell, Cohort, PopulationGrid};

use crate::{DispersalError, DispersalResult, OutboundRecord};

// ── DispersalOutcome ──────────────────────────────────────────────────────────

/// What one dispersal pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispersalOutcome {
    /// Cohort moves applied in phase 2.
    pub total_dispersals: u64,

    /// `true` when cancellation was observed between the phases; the grid is
    /// untouched and nothing was reported.
    pub cancelled: bool,
}

// ── DispersalEngine ───────────────────────────────────────────────────────────

/// Two-phase cross-cell mover.
///
/// Holds only run-constant settings; all per-timestep state lives on the
/// stack of [`run_timestep`][Self::run_timestep].
pub struct DispersalEngine {
    /// Mass-band tolerance for merging an arrival into an existing cohort.
    /// The conservation rule is the compactor's.
    pub tolerance: MergeTolerance,

    /// Per-cell cap on sampled moved masses reported to the cross-cell
    /// tracker.
    pub sample_cap: usize,
}

impl DispersalEngine {
    pub fn new(tolerance: MergeTolerance, sample_cap: usize) -> Self {
        Self {
            tolerance,
            sample_cap,
        }
    }

    /// Run one full dispersal pass over `grid`.
    ///
    /// `seed` is the run's global seed; per-cell RNGs are derived from it so
    /// results are independent of worker assignment.
    pub fn run_timestep(
        &self,
        grid:     &mut PopulationGrid,
        rule:     &dyn DispersalRule,
        tracker:  &dyn CrossCellProcessTracker,
        timestep: Timestep,
        seed:     u64,
        cancel:   &CancelToken,
    ) -> DispersalResult<DispersalOutcome> {
        // ── Phase 1: per-cell local compute (read-only) ───────────────────
        let outboxes = self.phase_one(grid, rule, timestep, seed)?;

        // The only cancellation point: phase 1 mutated nothing, so stopping
        // here leaves the grid consistent without any rollback.
        if cancel.is_cancelled() {
            return Ok(DispersalOutcome {
                total_dispersals: 0,
                cancelled: true,
            });
        }

        // ── Phase 2: sequential apply in fixed order ──────────────────────
        let outcome = self.phase_two(grid, outboxes, timestep, tracker)?;
        Ok(outcome)
    }

    // ── Phase 1 ───────────────────────────────────────────────────────────

    /// Consult the rule for every cohort of every cell, producing one
    /// outbound list per cell.  Never mutates the grid.
    fn phase_one(
        &self,
        grid:     &PopulationGrid,
        rule:     &dyn DispersalRule,
        timestep: Timestep,
        seed:     u64,
    ) -> DispersalResult<Vec<Vec<OutboundRecord>>> {
        let shape = grid.shape;

        let compute = |(index, cell): (usize, &Cell)| -> DispersalResult<Vec<OutboundRecord>> {
            let cell_id = CellId(index as u32);
            let mut rng = CellRng::new(seed, cell_id, timestep);
            let mut outbox = Vec::new();

            for (g, list) in cell.cohorts.iter().enumerate() {
                for (i, cohort) in list.iter().enumerate() {
                    let Some(decision) = rule.evaluate(cohort, cell, &shape, &mut rng) else {
                        continue;
                    };
                    if decision.destination == cell_id {
                        return Err(DispersalError::SelfDispersal(cell_id));
                    }
                    if !shape.contains(decision.destination) {
                        return Err(DispersalError::DestinationOutOfRange {
                            from: cell_id,
                            to:   decision.destination,
                        });
                    }
                    outbox.push(OutboundRecord {
                        group: FunctionalGroupId(g as u16),
                        index: i,
                        from:  cell_id,
                        to:    decision.destination,
                        exit:  decision.exit,
                        entry: decision.exit.opposite(),
                    });
                }
            }
            Ok(outbox)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            grid.cells()
                .par_iter()
                .enumerate()
                .map(compute)
                .collect::<DispersalResult<Vec<_>>>()
        }

        #[cfg(not(feature = "parallel"))]
        {
            grid.cells()
                .iter()
                .enumerate()
                .map(compute)
                .collect::<DispersalResult<Vec<_>>>()
        }
    }

    // ── Phase 2 ───────────────────────────────────────────────────────────

    /// Apply every outbound record, in source-cell then push order, to its
    /// destination.  Updates directional counters and reports summaries.
    ///
    /// Every departure is extracted before any arrival is applied.  Applying
    /// as we went would let an arrival merge into a cohort that is itself
    /// about to depart, dragging the arrival through two cells in one
    /// timestep.
    fn phase_two(
        &self,
        grid:     &mut PopulationGrid,
        outboxes: Vec<Vec<OutboundRecord>>,
        timestep: Timestep,
        tracker:  &dyn CrossCellProcessTracker,
    ) -> DispersalResult<DispersalOutcome> {
        let mut summaries: BTreeMap<CellId, DispersalSummary> = BTreeMap::new();
        let mut total = 0u64;

        // ── Extract all departures ────────────────────────────────────────
        //
        // Per source cell, removal runs in descending (group, index) order so
        // earlier positions stay valid; `moves` still ends up in the fixed
        // apply order (source cell, then record push order).
        let mut moves: Vec<(OutboundRecord, Cohort)> = Vec::new();
        for records in outboxes {
            let mut positions: Vec<usize> = (0..records.len()).collect();
            positions.sort_by(|&a, &b| {
                (records[b].group, records[b].index).cmp(&(records[a].group, records[a].index))
            });

            let mut departures: Vec<(usize, Cohort)> = Vec::with_capacity(records.len());
            for &pos in &positions {
                let record = &records[pos];
                let source = grid.cell_mut(record.from)?;
                let cohort = source.cohorts[record.group.index()].remove(record.index);
                departures.push((pos, cohort));
            }
            departures.sort_by_key(|&(pos, _)| pos);

            for (pos, cohort) in departures {
                moves.push((records[pos].clone(), cohort));
            }
        }

        // ── Apply all arrivals in fixed order ─────────────────────────────
        for (record, cohort) in moves {
            summaries
                .entry(record.from)
                .or_insert_with(|| DispersalSummary::new(record.from))
                .outbound[record.exit.index()] += 1;

            let inbound = summaries
                .entry(record.to)
                .or_insert_with(|| DispersalSummary::new(record.to));
            inbound.inbound[record.entry.index()] += 1;
            if inbound.sampled_masses.len() < self.sample_cap {
                inbound.sampled_masses.push(cohort.body_mass);
            }

            self.apply_arrival(grid, &record, cohort)?;
            total += 1;
        }

        let summaries: Vec<DispersalSummary> = summaries.into_values().collect();
        tracker.record_dispersals(timestep, &summaries, total);

        Ok(DispersalOutcome {
            total_dispersals: total,
            cancelled: false,
        })
    }

    /// Merge `cohort` into the closest matching destination cohort of the
    /// same functional group and mass band, or insert it as-is.
    fn apply_arrival(
        &self,
        grid:   &mut PopulationGrid,
        record: &OutboundRecord,
        cohort: Cohort,
    ) -> DispersalResult<()> {
        let destination = grid.cell_mut(record.to)?;
        let list = &mut destination.cohorts[record.group.index()];

        let mut best: Option<(f64, usize)> = None;
        for (k, existing) in list.iter().enumerate() {
            if !within_tolerance(existing, &cohort, &self.tolerance) {
                continue;
            }
            let d = merge_distance(existing, &cohort);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, k));
            }
        }

        match best {
            Some((_, k)) => merge_into(&mut list[k], cohort),
            None => list.push(cohort),
        }
        Ok(())
    }
}
