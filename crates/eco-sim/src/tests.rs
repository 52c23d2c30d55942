//! Integration tests for eco-sim.

use std::collections::BTreeSet;
use std::sync::Mutex;

use eco_core::{
    CancelToken, CellId, CellRng, CohortId, Direction, FunctionalGroupId, ModelConfig, Timestep,
};
use eco_ecology::{
    ActorRef, DispersalDecision, DispersalRule, EcologyModel, NoopEcology, NoopScenario,
    ProcessTracker, SedentaryRule, TrackerSet,
};
use eco_grid::{
    Cell, Cohort, CohortSpec, GridShape, PopulationGrid, PopulationGridBuilder, LAYER_AREA,
    LAYER_ORGANIC_POOL, LAYER_REALM,
};
use eco_groups::{FunctionalGroupDefinitions, FunctionalGroupDefinitionsBuilder};

use crate::{
    ModelState, NoopOutput, OutputDriver, RunState, SimError, SimulationBuilder,
    TimestepDiagnostics,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_timesteps: u64) -> ModelConfig {
    ModelConfig {
        total_timesteps,
        timesteps_per_year:   12,
        seed:                 42,
        num_threads:          Some(1),
        extinction_threshold: 0.0,
        max_cohorts_per_cell: 1000,
        merge_tolerance:      0.05,
        randomise_ordering:   false,
        realm_filter:         "all".into(),
        burnin_steps:         0,
        impact_steps:         0,
    }
}

fn shape(rows: u32, cols: u32) -> GridShape {
    GridShape {
        rows,
        cols,
        origin_lat: 60.0,
        origin_lon: -10.0,
        cell_size_deg: 1.0,
    }
}

fn grid(rows: u32, cols: u32) -> PopulationGrid {
    PopulationGridBuilder::new(shape(rows, cols), 1)
        .uniform_layer(LAYER_ORGANIC_POOL, 0.0)
        .uniform_layer(LAYER_REALM, 1.0)
        .uniform_layer(LAYER_AREA, 10_000.0)
        .build()
        .unwrap()
}

fn defs(group_count: usize) -> FunctionalGroupDefinitions {
    let mut b = FunctionalGroupDefinitionsBuilder::new();
    for i in 0..group_count {
        b.add_group(
            &format!("group {i}"),
            &[("nutrition source", "herbivory")],
            &[],
        );
    }
    b.build().unwrap()
}

fn spec(body: f64, abundance: f64) -> CohortSpec {
    CohortSpec {
        group: FunctionalGroupId(0),
        juvenile_mass: body * 0.1,
        adult_mass: body,
        body_mass: body,
        abundance,
        proportion_time_active: 0.5,
        trophic_index: 2.0,
        log_optimal_prey_size_ratio: 0.0,
    }
}

fn seed_cohort(grid: &mut PopulationGrid, cell: CellId, id: u64, body: f64, abundance: f64) {
    grid.cell_mut(cell)
        .unwrap()
        .push_cohort(FunctionalGroupId(0), Cohort::founder(CohortId(id), Timestep(0), &spec(body, abundance)));
}

/// Halves every actor's abundance each step.
struct Decay;
impl EcologyModel for Decay {
    fn run_within_cell_ecology(
        &self,
        actor: ActorRef,
        cell: &mut Cell,
        _groups: &FunctionalGroupDefinitions,
        _timestep: Timestep,
        _tracker: &dyn ProcessTracker,
        _rng: &mut CellRng,
    ) -> Vec<CohortSpec> {
        cell.cohorts[actor.group.index()][actor.index].abundance *= 0.5;
        vec![]
    }
}

/// Every actor produces one identical offspring each step.
struct SpawnOne;
impl EcologyModel for SpawnOne {
    fn run_within_cell_ecology(
        &self,
        _actor: ActorRef,
        _cell: &mut Cell,
        _groups: &FunctionalGroupDefinitions,
        _timestep: Timestep,
        _tracker: &dyn ProcessTracker,
        _rng: &mut CellRng,
    ) -> Vec<CohortSpec> {
        vec![spec(10.0, 20.0)]
    }
}

/// Every cohort moves east (wrapping) every timestep.
struct AlwaysEast;
impl DispersalRule for AlwaysEast {
    fn evaluate(
        &self,
        _cohort: &Cohort,
        cell: &Cell,
        shape: &GridShape,
        _rng: &mut CellRng,
    ) -> Option<DispersalDecision> {
        let here = shape.cell_id(cell.row, cell.col);
        shape.neighbour(here, Direction::East).map(|destination| DispersalDecision {
            destination,
            exit: Direction::East,
        })
    }
}

/// Output driver that records every hook invocation.
#[derive(Default)]
struct RecordingOutput {
    diagnostics: Vec<(Timestep, TimestepDiagnostics)>,
    timesteps:   Vec<Timestep>,
    saves:       Vec<Timestep>,
    years:       Vec<u64>,
    end_runs:    usize,
    last_state:  Option<ModelState>,
}

impl OutputDriver for RecordingOutput {
    fn record_diagnostics(&mut self, timestep: Timestep, diag: &TimestepDiagnostics) {
        self.diagnostics.push((timestep, *diag));
    }
    fn end_timestep(&mut self, timestep: Timestep, state: &ModelState) {
        self.timesteps.push(timestep);
        self.last_state = Some(state.clone());
    }
    fn save_timestep(&mut self, timestep: Timestep) {
        self.saves.push(timestep);
    }
    fn end_year(&mut self, year: u64) -> Option<String> {
        self.years.push(year);
        None
    }
    fn end_run(&mut self) {
        self.end_runs += 1;
    }
}

// ── SimulationBuilder validation ──────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = SimulationBuilder::new(
            test_config(10),
            grid(1, 2),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build()
        .unwrap();
        assert_eq!(sim.state(), RunState::Initialised);
        assert_eq!(sim.clock.current, Timestep(0));
    }

    #[test]
    fn unknown_realm_filter_rejected_before_any_timestep() {
        let mut config = test_config(10);
        config.realm_filter = "lunar".into();
        let result = SimulationBuilder::new(
            config,
            grid(1, 1),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn group_count_mismatch_rejected() {
        let result = SimulationBuilder::new(
            test_config(10),
            grid(1, 1), // dimensioned for 1 group
            defs(3),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build();
        assert!(matches!(result, Err(SimError::GroupCountMismatch { grid: 1, catalogue: 3 })));
    }

    #[test]
    fn missing_organic_pool_rejected() {
        let bare = PopulationGridBuilder::new(shape(1, 1), 1)
            .uniform_layer(LAYER_AREA, 1.0)
            .build()
            .unwrap();
        let result = SimulationBuilder::new(
            test_config(10),
            bare,
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build();
        assert!(matches!(result, Err(SimError::Grid(_))));
    }

    #[test]
    fn realm_layer_required_under_restricting_filter() {
        let no_realm = PopulationGridBuilder::new(shape(1, 1), 1)
            .uniform_layer(LAYER_ORGANIC_POOL, 0.0)
            .uniform_layer(LAYER_AREA, 1.0)
            .build()
            .unwrap();
        let mut config = test_config(10);
        config.realm_filter = "marine".into();
        let result = SimulationBuilder::new(
            config,
            no_realm,
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build();
        assert!(matches!(result, Err(SimError::Grid(_))));
    }

    #[test]
    fn seeded_cohort_invariants_checked() {
        let mut g = grid(1, 1);
        seed_cohort(&mut g, CellId(0), 0, 10.0, 5.0);
        g.cell_mut(CellId(0)).unwrap().cohorts[0][0].abundance = -1.0;

        let result = SimulationBuilder::new(
            test_config(10),
            g,
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build();
        assert!(matches!(result, Err(SimError::Grid(_))));
    }
}

// ── Scheduler aggregation ─────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn diagnostics_sum_across_cells() {
        // Two cells, one cohort each; Decay halves 10 → 5 which stays above
        // threshold 0, so drive extinction with a higher threshold instead.
        let mut g = grid(1, 2);
        seed_cohort(&mut g, CellId(0), 0, 10.0, 10.0);
        seed_cohort(&mut g, CellId(1), 1, 10.0, 10.0);

        let mut config = test_config(1);
        config.extinction_threshold = 6.0; // one halving drops below

        let mut sim = SimulationBuilder::new(config, g, defs(1), Decay, SedentaryRule, NoopScenario)
            .build()
            .unwrap();
        let mut output = RecordingOutput::default();
        sim.run(&mut output).unwrap();

        assert_eq!(output.diagnostics.len(), 1);
        let (_, diag) = output.diagnostics[0];
        assert_eq!(diag.extinctions, 2);
        assert_eq!(sim.diagnostics.cohorts_extinct, 2);
    }

    #[test]
    fn realm_filter_restricts_visited_cells() {
        // Cell 0 terrestrial, cell 1 marine; marine-only run must leave the
        // terrestrial cohort untouched.
        let mut g = PopulationGridBuilder::new(shape(1, 2), 1)
            .uniform_layer(LAYER_ORGANIC_POOL, 0.0)
            .uniform_layer(LAYER_AREA, 10_000.0)
            .layer(LAYER_REALM, vec![1.0, 2.0])
            .build()
            .unwrap();
        seed_cohort(&mut g, CellId(0), 0, 10.0, 10.0);
        seed_cohort(&mut g, CellId(1), 1, 10.0, 10.0);

        let mut config = test_config(1);
        config.realm_filter = "marine".into();

        let mut sim = SimulationBuilder::new(config, g, defs(1), Decay, SedentaryRule, NoopScenario)
            .build()
            .unwrap();
        sim.run(&mut NoopOutput).unwrap();

        let land = &sim.grid.cell(CellId(0)).unwrap().cohorts[0][0];
        let sea = &sim.grid.cell(CellId(1)).unwrap().cohorts[0][0];
        assert_eq!(land.abundance, 10.0, "terrestrial cell must be skipped");
        assert_eq!(sea.abundance, 5.0, "marine cell must be processed");
    }

    #[test]
    fn offspring_ids_unique_across_cells() {
        let mut g = grid(2, 2);
        for i in 0..4 {
            seed_cohort(&mut g, CellId(i), i as u64, 10.0, 10.0);
        }

        let mut sim =
            SimulationBuilder::new(test_config(1), g, defs(1), SpawnOne, SedentaryRule, NoopScenario)
                .build()
                .unwrap();
        sim.run(&mut NoopOutput).unwrap();

        let mut all_ids = BTreeSet::new();
        for (_, cell) in sim.grid.iter() {
            for (_, cohort) in cell.iter_cohorts() {
                for id in &cohort.lineage {
                    assert!(all_ids.insert(*id), "duplicate cohort id {id}");
                }
            }
        }
        // 4 founders (0-3) + 4 offspring (4-7).
        assert_eq!(all_ids.len(), 8);
        assert_eq!(sim.ids.peek(), 8);
        assert_eq!(sim.diagnostics.cohorts_produced, 4);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn noop_runs_to_end() {
        let mut sim = SimulationBuilder::new(
            test_config(10),
            grid(1, 1),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build()
        .unwrap();
        let state = sim.run(&mut NoopOutput).unwrap();
        assert_eq!(state, RunState::Completed);
        assert_eq!(sim.clock.current, Timestep(10));
    }

    #[test]
    fn output_hooks_called_each_timestep() {
        let mut config = test_config(4);
        config.timesteps_per_year = 2;

        let mut sim = SimulationBuilder::new(
            config,
            grid(1, 1),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build()
        .unwrap();

        let mut output = RecordingOutput::default();
        sim.run(&mut output).unwrap();

        assert_eq!(output.diagnostics.len(), 4);
        assert_eq!(output.timesteps, vec![Timestep(0), Timestep(1), Timestep(2), Timestep(3)]);
        assert_eq!(output.saves.len(), 4);
        assert_eq!(output.years, vec![0, 1], "two 2-step years completed");
        assert_eq!(output.end_runs, 1);
    }

    #[test]
    fn run_timesteps_advances_clock() {
        let mut sim = SimulationBuilder::new(
            test_config(100),
            grid(1, 1),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build()
        .unwrap();
        sim.run_timesteps(5, &mut NoopOutput).unwrap();
        assert_eq!(sim.clock.current, Timestep(5));
        sim.run_timesteps(3, &mut NoopOutput).unwrap();
        assert_eq!(sim.clock.current, Timestep(8));
    }

    #[test]
    fn scenario_impacts_precede_ecology() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        struct LogScenario;
        impl eco_ecology::ScenarioModel for LogScenario {
            fn apply_temperature_scenario(
                &self,
                _cell: &mut Cell,
                _s: &eco_ecology::ScenarioParameters,
                _t: Timestep,
                _b: u64,
                _i: u64,
                _a: bool,
            ) {
                LOG.lock().unwrap().push("temperature");
            }
            fn apply_harvesting(
                &self,
                _cell: &mut Cell,
                _s: &eco_ecology::ScenarioParameters,
                _t: Timestep,
                _b: u64,
                _i: u64,
                _a: bool,
            ) {
                LOG.lock().unwrap().push("harvesting");
            }
        }

        struct LogEcology;
        impl EcologyModel for LogEcology {
            fn run_within_cell_ecology(
                &self,
                _actor: ActorRef,
                _cell: &mut Cell,
                _groups: &FunctionalGroupDefinitions,
                _timestep: Timestep,
                _tracker: &dyn ProcessTracker,
                _rng: &mut CellRng,
            ) -> Vec<CohortSpec> {
                LOG.lock().unwrap().push("ecology");
                vec![]
            }
        }

        let mut g = grid(1, 1);
        seed_cohort(&mut g, CellId(0), 0, 10.0, 10.0);

        let mut sim =
            SimulationBuilder::new(test_config(1), g, defs(1), LogEcology, SedentaryRule, LogScenario)
                .build()
                .unwrap();
        sim.run(&mut NoopOutput).unwrap();

        assert_eq!(*LOG.lock().unwrap(), vec!["temperature", "harvesting", "ecology"]);
    }

    #[test]
    fn cancellation_stops_before_next_timestep() {
        // Output driver that requests cancellation after the second timestep.
        struct CancelAfter {
            token: CancelToken,
            after: usize,
            seen:  usize,
        }
        impl OutputDriver for CancelAfter {
            fn record_diagnostics(&mut self, _t: Timestep, _d: &TimestepDiagnostics) {
                self.seen += 1;
                if self.seen == self.after {
                    self.token.cancel();
                }
            }
        }

        let mut sim = SimulationBuilder::new(
            test_config(100),
            grid(1, 1),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build()
        .unwrap();

        let mut output = CancelAfter {
            token: sim.cancel_token(),
            after: 2,
            seen:  0,
        };
        let state = sim.run(&mut output).unwrap();

        assert_eq!(state, RunState::Cancelled);
        assert_eq!(sim.state(), RunState::Cancelled);
        assert_eq!(sim.clock.current, Timestep(2), "no further timestep may start");
    }

    #[test]
    fn end_run_called_exactly_once_on_cancellation() {
        let mut sim = SimulationBuilder::new(
            test_config(100),
            grid(1, 1),
            defs(1),
            NoopEcology,
            SedentaryRule,
            NoopScenario,
        )
        .build()
        .unwrap();

        sim.cancel_token().cancel();
        let mut output = RecordingOutput::default();
        let state = sim.run(&mut output).unwrap();
        assert_eq!(state, RunState::Cancelled);
        assert_eq!(output.end_runs, 1);

        // Running again must not re-finalize.
        sim.run(&mut output).unwrap();
        assert_eq!(output.end_runs, 1);
    }

    #[test]
    fn dispersal_counts_reach_diagnostics() {
        let mut g = grid(1, 2);
        seed_cohort(&mut g, CellId(0), 0, 10.0, 10.0);

        let mut sim = SimulationBuilder::new(
            test_config(1),
            g,
            defs(1),
            NoopEcology,
            AlwaysEast,
            NoopScenario,
        )
        .build()
        .unwrap();

        let mut output = RecordingOutput::default();
        sim.run(&mut output).unwrap();

        assert_eq!(output.diagnostics[0].1.dispersals, 1);
        assert_eq!(sim.diagnostics.cohorts_dispersed, 1);
        assert_eq!(sim.grid.cell(CellId(0)).unwrap().cohort_count(), 0);
        assert_eq!(sim.grid.cell(CellId(1)).unwrap().cohort_count(), 1);
    }

    #[test]
    fn fixed_point_grid_skips_dispersal() {
        let mut g = PopulationGridBuilder::new(shape(1, 2), 1)
            .uniform_layer(LAYER_ORGANIC_POOL, 0.0)
            .uniform_layer(LAYER_REALM, 1.0)
            .uniform_layer(LAYER_AREA, 10_000.0)
            .fixed_point_only(true)
            .build()
            .unwrap();
        seed_cohort(&mut g, CellId(0), 0, 10.0, 10.0);

        let mut sim = SimulationBuilder::new(
            test_config(3),
            g,
            defs(1),
            NoopEcology,
            AlwaysEast, // would move every step if dispersal ran
            NoopScenario,
        )
        .build()
        .unwrap();
        sim.run(&mut NoopOutput).unwrap();

        assert_eq!(sim.grid.cell(CellId(0)).unwrap().cohort_count(), 1);
        assert_eq!(sim.diagnostics.cohorts_dispersed, 0);
    }
}

// ── Checkpoint / resume / determinism ─────────────────────────────────────────

#[cfg(test)]
mod checkpoint_tests {
    use super::*;

    fn build_sim(total: u64) -> crate::Simulation<Decay, AlwaysEast, NoopScenario> {
        let mut g = grid(1, 2);
        seed_cohort(&mut g, CellId(0), 0, 10.0, 1000.0);
        seed_cohort(&mut g, CellId(1), 1, 12.0, 800.0);
        SimulationBuilder::new(test_config(total), g, defs(1), Decay, AlwaysEast, NoopScenario)
            .build()
            .unwrap()
    }

    #[test]
    fn capture_restore_round_trips() {
        let mut sim = build_sim(10);
        sim.run_timesteps(3, &mut NoopOutput).unwrap();

        let state = sim.capture_state();
        assert_eq!(state.timesteps_complete, 3);

        let (restored_grid, diagnostics, ids, steps) = state.clone().restore().unwrap();
        assert_eq!(restored_grid, sim.grid);
        assert_eq!(diagnostics, sim.diagnostics);
        assert_eq!(ids.peek(), sim.ids.peek());
        assert_eq!(steps, 3);
    }

    #[test]
    fn version_mismatch_rejected() {
        let sim = build_sim(1);
        let mut state = sim.capture_state();
        state.version = 99;
        assert!(matches!(
            state.restore(),
            Err(SimError::StateVersionMismatch { expected: 1, found: 99 })
        ));
    }

    #[test]
    fn diagnostics_map_round_trips_through_state() {
        let mut sim = build_sim(10);
        sim.run_timesteps(4, &mut NoopOutput).unwrap();
        let state = sim.capture_state();

        let restored = crate::GlobalDiagnostics::from_map(&state.global_diagnostics);
        assert_eq!(restored, sim.diagnostics);
        assert!(state.global_diagnostics.contains_key("stocks in model"));
    }

    #[test]
    fn identical_runs_yield_identical_states() {
        // Randomness disabled (seeded ordering): two runs from the same
        // configuration must produce identical successor states.
        let mut a = build_sim(5);
        let mut b = build_sim(5);
        a.run(&mut NoopOutput).unwrap();
        b.run(&mut NoopOutput).unwrap();
        assert_eq!(a.capture_state(), b.capture_state());
    }

    #[test]
    fn resumed_run_matches_uninterrupted_run() {
        // Run 5 straight timesteps...
        let mut straight = build_sim(5);
        straight.run(&mut NoopOutput).unwrap();

        // ...and the same 5 as 3 + checkpoint + 2.
        let mut first_leg = build_sim(5);
        first_leg.run_timesteps(3, &mut NoopOutput).unwrap();
        let snapshot = first_leg.capture_state();

        let mut g = grid(1, 2); // discarded by resume_from
        seed_cohort(&mut g, CellId(0), 0, 10.0, 1000.0);
        seed_cohort(&mut g, CellId(1), 1, 12.0, 800.0);
        let mut second_leg = SimulationBuilder::new(
            test_config(5),
            g,
            defs(1),
            Decay,
            AlwaysEast,
            NoopScenario,
        )
        .resume_from(snapshot)
        .build()
        .unwrap();
        assert_eq!(second_leg.clock.current, Timestep(3));
        second_leg.run(&mut NoopOutput).unwrap();

        assert_eq!(straight.capture_state(), second_leg.capture_state());
    }
}
