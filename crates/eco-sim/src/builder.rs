//! Fluent builder for constructing a [`Simulation`].

use eco_cell::{EngineSettings, MergeTolerance, OrderingPolicy};
use eco_core::{CohortIdSource, ModelConfig, RealmFilter, Timestep};
use eco_dispersal::DispersalEngine;
use eco_ecology::{DispersalRule, EcologyModel, ScenarioModel, ScenarioParameters, TrackerSet};
use eco_grid::{PopulationGrid, LAYER_AREA, LAYER_ORGANIC_POOL, LAYER_REALM};
use eco_groups::FunctionalGroupDefinitions;

use crate::sim::SimulationParts;
use crate::{GlobalDiagnostics, ModelState, SimError, SimResult, Simulation};

/// Default cap on sampled moved masses per cell per timestep.
const DISPERSAL_SAMPLE_CAP: usize = 10;

/// One past the largest lineage ID present anywhere in `grid`.
fn next_free_cohort_id(grid: &PopulationGrid) -> u64 {
    grid.cells()
        .iter()
        .flat_map(|cell| cell.iter_cohorts())
        .flat_map(|(_, cohort)| cohort.lineage.iter())
        .map(|id| id.0)
        .max()
        .map_or(0, |max| max + 1)
}

/// Fluent builder for [`Simulation<E, D, S>`].
///
/// # Required inputs
///
/// - [`ModelConfig`] — timestep counts, seed, thresholds, realm filter, …
/// - [`PopulationGrid`] — seeded cell state (see `PopulationGridBuilder`)
/// - [`FunctionalGroupDefinitions`] — the group catalogue
/// - `E: EcologyModel`, `D: DispersalRule`, `S: ScenarioModel` — the external
///   collaborators
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                          |
/// |-------------------|----------------------------------|
/// | `.trackers(t)`    | Empty `TrackerSet` (no sinks)    |
/// | `.scenario(p)`    | `ScenarioParameters::none()`     |
/// | `.resume_from(s)` | Fresh run from timestep 0; IDs start above any seeded lineage |
///
/// # Validation
///
/// `build()` performs every fatal configuration check before the first
/// timestep can run: realm-filter parsing, functional-group count agreement,
/// required environment layers on every cell, realm decodability under a
/// restricting filter, and the invariants of every seeded cohort.
pub struct SimulationBuilder<E: EcologyModel, D: DispersalRule, S: ScenarioModel> {
    config:         ModelConfig,
    grid:           PopulationGrid,
    groups:         FunctionalGroupDefinitions,
    ecology:        E,
    dispersal_rule: D,
    scenario_model: S,
    trackers:       Option<TrackerSet>,
    scenario:       Option<ScenarioParameters>,
    resume:         Option<ModelState>,
}

impl<E: EcologyModel, D: DispersalRule, S: ScenarioModel> SimulationBuilder<E, D, S> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:         ModelConfig,
        grid:           PopulationGrid,
        groups:         FunctionalGroupDefinitions,
        ecology:        E,
        dispersal_rule: D,
        scenario_model: S,
    ) -> Self {
        Self {
            config,
            grid,
            groups,
            ecology,
            dispersal_rule,
            scenario_model,
            trackers: None,
            scenario: None,
            resume:   None,
        }
    }

    /// Supply tracker sinks.  If not called, every report is dropped.
    pub fn trackers(mut self, trackers: TrackerSet) -> Self {
        self.trackers = Some(trackers);
        self
    }

    /// Supply the per-run perturbation set.
    pub fn scenario(mut self, scenario: ScenarioParameters) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Resume from a checkpoint instead of the supplied grid.
    ///
    /// The snapshot's cells, diagnostics, timestep count, and next-cohort-ID
    /// counter replace the fresh-run defaults; the grid passed to
    /// [`new`][Self::new] is discarded.
    pub fn resume_from(mut self, state: ModelState) -> Self {
        self.resume = Some(state);
        self
    }

    /// Validate all inputs and assemble a ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation<E, D, S>> {
        // ── Configuration checks ──────────────────────────────────────────
        let realm_filter = RealmFilter::parse(&self.config.realm_filter)?;

        if self.config.timesteps_per_year == 0 {
            return Err(SimError::Config("timesteps_per_year must be positive".into()));
        }
        if self.config.max_cohorts_per_cell == 0 {
            return Err(SimError::Config("max_cohorts_per_cell must be positive".into()));
        }

        // ── Resolve fresh-run vs resume state ─────────────────────────────
        let (grid, diagnostics, ids, timesteps_complete) = match self.resume {
            Some(state) => state.restore()?,
            None => {
                // Seeding code mints founder IDs itself, so a fresh run must
                // start allocating above them.
                let next = next_free_cohort_id(&self.grid);
                (
                    self.grid,
                    GlobalDiagnostics::default(),
                    CohortIdSource::new(next),
                    0,
                )
            }
        };

        // ── Cross-input agreement ─────────────────────────────────────────
        if grid.group_count != self.groups.group_count() {
            return Err(SimError::GroupCountMismatch {
                grid:      grid.group_count,
                catalogue: self.groups.group_count(),
            });
        }

        // ── Per-cell checks: layers, realm, seeded cohort invariants ──────
        for (_, cell) in grid.iter() {
            cell.env_value(LAYER_ORGANIC_POOL)?;
            cell.env_value(LAYER_AREA)?;
            if realm_filter != RealmFilter::All {
                cell.env_value(LAYER_REALM)?;
                cell.realm()?;
            }
            for (_, cohort) in cell.iter_cohorts() {
                cohort.validate()?;
            }
        }

        // ── Derived engine settings ───────────────────────────────────────
        let mut clock = self.config.make_clock();
        clock.current = Timestep(timesteps_complete);

        let tolerance = MergeTolerance::uniform(self.config.merge_tolerance);
        let settings = EngineSettings {
            extinction_threshold: self.config.extinction_threshold,
            max_cohorts:          self.config.max_cohorts_per_cell,
            tolerance,
            ordering: if self.config.randomise_ordering {
                OrderingPolicy::Random
            } else {
                OrderingPolicy::SeededByTimestep
            },
            days_per_timestep: clock.days_per_timestep(),
        };

        Ok(Simulation::from_parts(SimulationParts {
            config:         self.config,
            clock,
            grid,
            groups:         self.groups,
            scenario:       self.scenario.unwrap_or_default(),
            trackers:       self.trackers.unwrap_or_default(),
            ids,
            diagnostics,
            ecology:        self.ecology,
            dispersal_rule: self.dispersal_rule,
            scenario_model: self.scenario_model,
            dispersal:      DispersalEngine::new(tolerance, DISPERSAL_SAMPLE_CAP),
            settings,
            realm_filter,
        }))
    }
}
