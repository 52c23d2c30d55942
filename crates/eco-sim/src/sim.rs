//! The `Simulation` struct and its timestep loop.

use eco_cell::EngineSettings;
use eco_core::{CancelToken, CohortIdSource, ModelClock, ModelConfig, RealmFilter};
use eco_dispersal::DispersalEngine;
use eco_ecology::{
    DispersalRule, EcologyModel, ScenarioModel, ScenarioParameters, TrackerSet,
};
use eco_grid::{PopulationGrid, LAYER_SCENARIO_MASK};
use eco_groups::FunctionalGroupDefinitions;

use crate::diagnostics::GlobalDiagnostics;
use crate::{scheduler, ModelState, OutputDriver, SimResult};

// ── RunState ──────────────────────────────────────────────────────────────────

/// Lifecycle of a simulation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunState {
    /// Built and validated; no timestep has run yet.
    Initialised,
    /// At least one timestep has run; the loop is live.
    Running,
    /// The configured timestep count finished.
    Completed,
    /// Cancellation was observed; outputs were finalized.
    Cancelled,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Simulation<E, D, S>` owns all mutable state and drives the per-timestep
/// sequence: scenario impacts → ecology over all cells → dispersal →
/// checkpoint and outputs.  Create via
/// [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation<E: EcologyModel, D: DispersalRule, S: ScenarioModel> {
    /// Global configuration (total timesteps, seed, thresholds, …).
    pub config: ModelConfig,

    /// Simulation clock — tracks the current timestep and year boundaries.
    pub clock: ModelClock,

    /// All cell state.  Partitioned by cell during the ecology phase.
    pub grid: PopulationGrid,

    /// Read-only functional-group catalogue.
    pub groups: FunctionalGroupDefinitions,

    /// Read-only per-run perturbation set.
    pub scenario: ScenarioParameters,

    /// Tracker fan-out; shared with every worker.
    pub trackers: TrackerSet,

    /// Shared next-cohort-ID allocator.
    pub ids: CohortIdSource,

    /// Whole-run diagnostic totals.
    pub diagnostics: GlobalDiagnostics,

    pub(crate) ecology:        E,
    pub(crate) dispersal_rule: D,
    pub(crate) scenario_model: S,
    pub(crate) dispersal:      DispersalEngine,
    pub(crate) settings:       EngineSettings,
    pub(crate) realm_filter:   RealmFilter,
    pub(crate) cancel:         CancelToken,
    pub(crate) state:          RunState,
    pub(crate) run_ended:      bool,
}

impl<E: EcologyModel, D: DispersalRule, S: ScenarioModel> Simulation<E, D, S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// A handle the host can use to request cancellation from another
    /// thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Capture a [`ModelState`] snapshot of the current moment.
    ///
    /// `&self` guarantees no grid mutation can interleave with the capture.
    pub fn capture_state(&self) -> ModelState {
        ModelState::capture(
            &self.grid,
            self.diagnostics,
            &self.ids,
            self.clock.current.0,
        )
    }

    /// Run from the current timestep to `config.total_timesteps`.
    ///
    /// Calls output-driver hooks at every timestep boundary and finalizes
    /// them (exactly one `end_run`) on completion or cancellation.
    pub fn run<O: OutputDriver>(&mut self, output: &mut O) -> SimResult<RunState> {
        self.state = RunState::Running;
        loop {
            if self.cancel.is_cancelled() {
                return self.finalize(output, RunState::Cancelled);
            }
            if self.clock.current >= self.config.end_timestep() {
                return self.finalize(output, RunState::Completed);
            }
            if !self.process_timestep(output)? {
                return self.finalize(output, RunState::Cancelled);
            }
        }
    }

    /// Run exactly `n` timesteps from the current position (ignores
    /// `total_timesteps`).  Useful for tests and incremental stepping.
    pub fn run_timesteps<O: OutputDriver>(&mut self, n: u64, output: &mut O) -> SimResult<RunState> {
        self.state = RunState::Running;
        for _ in 0..n {
            if self.cancel.is_cancelled() {
                return self.finalize(output, RunState::Cancelled);
            }
            if !self.process_timestep(output)? {
                return self.finalize(output, RunState::Cancelled);
            }
        }
        Ok(self.state)
    }

    // ── Core timestep processing ──────────────────────────────────────────

    /// Run one full timestep.  Returns `false` if cancellation was observed
    /// at an internal phase boundary (the timestep is then left incomplete
    /// but consistent — nothing is rolled back).
    fn process_timestep<O: OutputDriver>(&mut self, output: &mut O) -> SimResult<bool> {
        let now = self.clock.current;

        // ── Phase 1: scenario impacts (external, per cell, before ecology) ─
        for cell in self.grid.cells_mut() {
            let affected = cell.env_value_or(LAYER_SCENARIO_MASK, 1.0) != 0.0;
            self.scenario_model.apply_temperature_scenario(
                cell,
                &self.scenario,
                now,
                self.config.burnin_steps,
                self.config.impact_steps,
                affected,
            );
            self.scenario_model.apply_harvesting(
                cell,
                &self.scenario,
                now,
                self.config.burnin_steps,
                self.config.impact_steps,
                affected,
            );
        }

        // ── Phase 2: within-cell ecology over all admitted cells ──────────
        let mut diag = scheduler::run_timestep(
            &mut self.grid,
            &self.ecology,
            &self.groups,
            &self.trackers,
            &self.ids,
            &self.settings,
            self.realm_filter,
            now,
            self.config.seed,
        )?;

        // ── Phase 3: dispersal (skipped for fixed-point-only grids) ───────
        if !self.grid.fixed_point_only {
            let outcome = self.dispersal.run_timestep(
                &mut self.grid,
                &self.dispersal_rule,
                &self.trackers,
                now,
                self.config.seed,
                &self.cancel,
            )?;
            if outcome.cancelled {
                // Partial-progress diagnostics are still observable.
                output.record_diagnostics(now, &diag);
                return Ok(false);
            }
            diag.dispersals = outcome.total_dispersals;
        }

        self.diagnostics.absorb(diag);
        self.clock.advance();

        // ── Phase 4: checkpoint + outputs ─────────────────────────────────
        let state = self.capture_state();
        output.record_diagnostics(now, &diag);
        output.end_timestep(now, &state);
        output.save_timestep(now);
        if self.clock.at_year_boundary() {
            output.end_year(self.clock.years_complete() - 1);
        }

        Ok(true)
    }

    /// Finalize outputs (exactly once) and settle into `state`.
    fn finalize<O: OutputDriver>(&mut self, output: &mut O, state: RunState) -> SimResult<RunState> {
        if !self.run_ended {
            output.end_run();
            self.run_ended = true;
        }
        self.state = state;
        Ok(state)
    }
}

// ── Internal constructor used by SimulationBuilder ───────────────────────────

pub(crate) struct SimulationParts<E, D, S> {
    pub config:         ModelConfig,
    pub clock:          ModelClock,
    pub grid:           PopulationGrid,
    pub groups:         FunctionalGroupDefinitions,
    pub scenario:       ScenarioParameters,
    pub trackers:       TrackerSet,
    pub ids:            CohortIdSource,
    pub diagnostics:    GlobalDiagnostics,
    pub ecology:        E,
    pub dispersal_rule: D,
    pub scenario_model: S,
    pub dispersal:      DispersalEngine,
    pub settings:       EngineSettings,
    pub realm_filter:   RealmFilter,
}

impl<E: EcologyModel, D: DispersalRule, S: ScenarioModel> Simulation<E, D, S> {
    pub(crate) fn from_parts(parts: SimulationParts<E, D, S>) -> Self {
        Simulation {
            config:         parts.config,
            clock:          parts.clock,
            grid:           parts.grid,
            groups:         parts.groups,
            scenario:       parts.scenario,
            trackers:       parts.trackers,
            ids:            parts.ids,
            diagnostics:    parts.diagnostics,
            ecology:        parts.ecology,
            dispersal_rule: parts.dispersal_rule,
            scenario_model: parts.scenario_model,
            dispersal:      parts.dispersal,
            settings:       parts.settings,
            realm_filter:   parts.realm_filter,
            cancel:         CancelToken::new(),
            state:          RunState::Initialised,
            run_ended:      false,
        }
    }
}
