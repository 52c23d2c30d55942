//! Process-tracking interfaces the core reports into.
//!
//! Trackers are observation-only: nothing the core computes depends on what a
//! tracker does with a report.  Every hook has a no-op default so sinks
//! implement only what they record, and [`TrackerSet`] fans a single report
//! out to zero or more sinks — the core tolerates an empty set.
//!
//! Hooks take `&self` because they are called from parallel workers; sinks
//! that accumulate state use their own interior mutability (atomics or a
//! mutex), keeping the hot path lock-free for sinks that don't.

use std::collections::BTreeSet;
use std::sync::Arc;

use eco_core::{CellId, CohortId, Direction, FunctionalGroupId, Timestep};

// ── ProcessTracker ────────────────────────────────────────────────────────────

/// Per-cohort and per-flow reports from within-cell processing.
pub trait ProcessTracker: Send + Sync {
    /// A cohort was created (seeding or reproduction).
    fn record_new_cohort(
        &self,
        _cell:          CellId,
        _group:         FunctionalGroupId,
        _id:            CohortId,
        _abundance:     f64,
        _juvenile_mass: f64,
    ) {
    }

    /// A cohort matured this timestep.
    fn track_maturity(
        &self,
        _cell:      CellId,
        _group:     FunctionalGroupId,
        _timestep:  Timestep,
        _birth:     Timestep,
        _body_mass: f64,
    ) {
    }

    /// Mass flowed from a prey cohort to a predator cohort.
    fn track_predation_trophic_flow(
        &self,
        _cell:           CellId,
        _predator_group: FunctionalGroupId,
        _prey_group:     FunctionalGroupId,
        _mass_eaten:     f64,
        _timestep:       Timestep,
    ) {
    }

    /// Mass flowed from a stock to a herbivore cohort.
    fn track_herbivory_trophic_flow(
        &self,
        _cell:            CellId,
        _herbivore_group: FunctionalGroupId,
        _mass_eaten:      f64,
        _timestep:        Timestep,
    ) {
    }

    /// Individuals died of a named cause.
    fn record_mortality(
        &self,
        _cell:           CellId,
        _group:          FunctionalGroupId,
        _cause:          &str,
        _abundance_lost: f64,
    ) {
    }

    /// A cohort was removed by the extinction sweep.
    fn record_extinction(&self, _cell: CellId, _merged: bool, _lineage: &BTreeSet<CohortId>) {}

    /// Emit the accumulated mortality profile of a dying cohort.
    fn output_mortality_profile(&self, _cohort: CohortId) {}

    /// Metabolic mass loss for one actor this timestep.
    fn track_timestep_metabolism(
        &self,
        _cell:      CellId,
        _group:     FunctionalGroupId,
        _mass_lost: f64,
        _timestep:  Timestep,
    ) {
    }

    /// Somatic growth for one actor this timestep.
    fn track_timestep_growth(
        &self,
        _cell:        CellId,
        _group:       FunctionalGroupId,
        _mass_gained: f64,
        _timestep:    Timestep,
    ) {
    }
}

// ── GlobalProcessTracker ──────────────────────────────────────────────────────

/// Whole-model production accounting, reported per stock per cell.
pub trait GlobalProcessTracker: Send + Sync {
    /// Net primary production entering a stock this timestep.
    fn record_npp(&self, _cell: CellId, _stock_group: FunctionalGroupId, _npp: f64, _timestep: Timestep) {}

    /// Human appropriation of net primary production this timestep.
    fn record_hanpp(&self, _cell: CellId, _stock_group: FunctionalGroupId, _hanpp: f64, _timestep: Timestep) {}
}

// ── CrossCellProcessTracker ───────────────────────────────────────────────────

/// Per-cell dispersal activity for one timestep.
///
/// Direction arrays are indexed by [`Direction::index`]; `sampled_masses`
/// holds the body masses of up to a configured number of moved cohorts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispersalSummary {
    pub cell: CellId,
    pub inbound:  [u64; Direction::COUNT],
    pub outbound: [u64; Direction::COUNT],
    pub sampled_masses: Vec<f64>,
}

impl DispersalSummary {
    pub fn new(cell: CellId) -> Self {
        Self {
            cell,
            ..Self::default()
        }
    }

    /// Total cohorts that left this cell.
    pub fn total_outbound(&self) -> u64 {
        self.outbound.iter().sum()
    }

    /// Total cohorts that entered this cell.
    pub fn total_inbound(&self) -> u64 {
        self.inbound.iter().sum()
    }
}

/// Cross-cell movement reports, once per timestep after dispersal phase 2.
pub trait CrossCellProcessTracker: Send + Sync {
    fn record_dispersals(
        &self,
        _timestep:  Timestep,
        _summaries: &[DispersalSummary],
        _total:     u64,
    ) {
    }
}

// ── TrackerSet ────────────────────────────────────────────────────────────────

/// Fan-out container over zero or more sinks of each tracker kind.
///
/// Implements all three tracker traits by forwarding every report to every
/// registered sink, in registration order.  Cloning shares the sinks.
#[derive(Clone, Default)]
pub struct TrackerSet {
    process:    Vec<Arc<dyn ProcessTracker>>,
    global:     Vec<Arc<dyn GlobalProcessTracker>>,
    cross_cell: Vec<Arc<dyn CrossCellProcessTracker>>,
}

impl TrackerSet {
    /// An empty set: every report is dropped.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_process(&mut self, sink: Arc<dyn ProcessTracker>) {
        self.process.push(sink);
    }

    pub fn add_global(&mut self, sink: Arc<dyn GlobalProcessTracker>) {
        self.global.push(sink);
    }

    pub fn add_cross_cell(&mut self, sink: Arc<dyn CrossCellProcessTracker>) {
        self.cross_cell.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.process.is_empty() && self.global.is_empty() && self.cross_cell.is_empty()
    }
}

impl ProcessTracker for TrackerSet {
    fn record_new_cohort(
        &self,
        cell:          CellId,
        group:         FunctionalGroupId,
        id:            CohortId,
        abundance:     f64,
        juvenile_mass: f64,
    ) {
        for sink in &self.process {
            sink.record_new_cohort(cell, group, id, abundance, juvenile_mass);
        }
    }

    fn track_maturity(
        &self,
        cell:      CellId,
        group:     FunctionalGroupId,
        timestep:  Timestep,
        birth:     Timestep,
        body_mass: f64,
    ) {
        for sink in &self.process {
            sink.track_maturity(cell, group, timestep, birth, body_mass);
        }
    }

    fn track_predation_trophic_flow(
        &self,
        cell:           CellId,
        predator_group: FunctionalGroupId,
        prey_group:     FunctionalGroupId,
        mass_eaten:     f64,
        timestep:       Timestep,
    ) {
        for sink in &self.process {
            sink.track_predation_trophic_flow(cell, predator_group, prey_group, mass_eaten, timestep);
        }
    }

    fn track_herbivory_trophic_flow(
        &self,
        cell:            CellId,
        herbivore_group: FunctionalGroupId,
        mass_eaten:      f64,
        timestep:        Timestep,
    ) {
        for sink in &self.process {
            sink.track_herbivory_trophic_flow(cell, herbivore_group, mass_eaten, timestep);
        }
    }

    fn record_mortality(
        &self,
        cell:           CellId,
        group:          FunctionalGroupId,
        cause:          &str,
        abundance_lost: f64,
    ) {
        for sink in &self.process {
            sink.record_mortality(cell, group, cause, abundance_lost);
        }
    }

    fn record_extinction(&self, cell: CellId, merged: bool, lineage: &BTreeSet<CohortId>) {
        for sink in &self.process {
            sink.record_extinction(cell, merged, lineage);
        }
    }

    fn output_mortality_profile(&self, cohort: CohortId) {
        for sink in &self.process {
            sink.output_mortality_profile(cohort);
        }
    }

    fn track_timestep_metabolism(
        &self,
        cell:      CellId,
        group:     FunctionalGroupId,
        mass_lost: f64,
        timestep:  Timestep,
    ) {
        for sink in &self.process {
            sink.track_timestep_metabolism(cell, group, mass_lost, timestep);
        }
    }

    fn track_timestep_growth(
        &self,
        cell:        CellId,
        group:       FunctionalGroupId,
        mass_gained: f64,
        timestep:    Timestep,
    ) {
        for sink in &self.process {
            sink.track_timestep_growth(cell, group, mass_gained, timestep);
        }
    }
}

impl GlobalProcessTracker for TrackerSet {
    fn record_npp(&self, cell: CellId, stock_group: FunctionalGroupId, npp: f64, timestep: Timestep) {
        for sink in &self.global {
            sink.record_npp(cell, stock_group, npp, timestep);
        }
    }

    fn record_hanpp(&self, cell: CellId, stock_group: FunctionalGroupId, hanpp: f64, timestep: Timestep) {
        for sink in &self.global {
            sink.record_hanpp(cell, stock_group, hanpp, timestep);
        }
    }
}

impl CrossCellProcessTracker for TrackerSet {
    fn record_dispersals(&self, timestep: Timestep, summaries: &[DispersalSummary], total: u64) {
        for sink in &self.cross_cell {
            sink.record_dispersals(timestep, summaries, total);
        }
    }
}
