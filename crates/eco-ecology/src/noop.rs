//! No-op collaborators — placeholders for tests and passive runs.

use eco_core::{CellRng, Timestep};
use eco_grid::{Cell, Cohort, CohortSpec, GridShape};
use eco_groups::FunctionalGroupDefinitions;

use crate::{
    ActorRef, DispersalDecision, DispersalRule, EcologyModel, ProcessTracker, ScenarioModel,
    ScenarioParameters,
};

/// An [`EcologyModel`] that changes nothing and produces no offspring.
pub struct NoopEcology;

impl EcologyModel for NoopEcology {
    fn run_within_cell_ecology(
        &self,
        _actor:    ActorRef,
        _cell:     &mut Cell,
        _groups:   &FunctionalGroupDefinitions,
        _timestep: Timestep,
        _tracker:  &dyn ProcessTracker,
        _rng:      &mut CellRng,
    ) -> Vec<CohortSpec> {
        vec![]
    }
}

/// A [`DispersalRule`] under which no cohort ever moves.
pub struct SedentaryRule;

impl DispersalRule for SedentaryRule {
    fn evaluate(
        &self,
        _cohort: &Cohort,
        _cell:   &Cell,
        _shape:  &GridShape,
        _rng:    &mut CellRng,
    ) -> Option<DispersalDecision> {
        None
    }
}

/// A [`ScenarioModel`] that applies no impacts.
pub struct NoopScenario;

impl ScenarioModel for NoopScenario {
    fn apply_temperature_scenario(
        &self,
        _cell:         &mut Cell,
        _scenario:     &ScenarioParameters,
        _timestep:     Timestep,
        _burnin_steps: u64,
        _impact_steps: u64,
        _affected:     bool,
    ) {
    }

    fn apply_harvesting(
        &self,
        _cell:         &mut Cell,
        _scenario:     &ScenarioParameters,
        _timestep:     Timestep,
        _burnin_steps: u64,
        _impact_steps: u64,
        _affected:     bool,
    ) {
    }
}
