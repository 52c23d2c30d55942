//! The `EcologyModel` trait — the main extension point for biology code.

use eco_core::{CellRng, FunctionalGroupId, Timestep};
use eco_grid::{Cell, CohortSpec};
use eco_groups::FunctionalGroupDefinitions;

use crate::ProcessTracker;

/// Position of the acting cohort inside its cell.
///
/// Actors are addressed by `(functional group, list position)` resolved
/// against the engine's start-of-pass snapshot, so offspring appended during
/// the pass never shift an actor's address.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ActorRef {
    pub group: FunctionalGroupId,
    pub index: usize,
}

/// Pluggable within-cell biology.
///
/// Implement this trait to define how an acting cohort grows, metabolises,
/// eats, dies, and reproduces.  The within-cell engine calls
/// [`run_within_cell_ecology`][Self::run_within_cell_ecology] once per
/// qualifying actor per timestep, in a permuted order it controls.
///
/// # Contract
///
/// - The callback may mutate the actor (via `cell.cohorts[actor.group][actor
///   .index]`), mutate the cell's stocks and environment layers, and report
///   mass flows to `tracker`.
/// - Offspring are returned as [`CohortSpec`]s; the engine allocates their
///   IDs, stamps the birth timestep, and appends them.  Appending directly
///   would let a collaborator mint identifiers, which the ID-allocation
///   design forbids.
/// - The callback must never leave negative mass or abundance on any cohort
///   or stock; the engine validates the actor after each call and fails the
///   timestep on a violation.
/// - The callback must not remove cohorts — death is expressed by driving
///   abundance to (or below) the extinction threshold and letting the sweep
///   collect the body.
///
/// # Thread safety
///
/// The scheduler may process many cells in parallel, so implementations must
/// be `Send + Sync`.  Anything that varies per cell belongs in the cell's own
/// state, not in the model.
pub trait EcologyModel: Send + Sync {
    /// Called once before a cell's actors are processed each timestep.
    ///
    /// `area_km2` is the cell's area; `days_per_timestep` the model time
    /// resolution.  The default does nothing.
    fn initialise_for_cell(&self, _area_km2: f64, _days_per_timestep: f64) {}

    /// Run one actor's within-cell biology.
    ///
    /// Returns specs for any offspring cohorts produced this step.  An empty
    /// `Vec` means no reproduction occurred.
    fn run_within_cell_ecology(
        &self,
        actor:    ActorRef,
        cell:     &mut Cell,
        groups:   &FunctionalGroupDefinitions,
        timestep: Timestep,
        tracker:  &dyn ProcessTracker,
        rng:      &mut CellRng,
    ) -> Vec<CohortSpec>;
}
