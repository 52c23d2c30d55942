//! The `DispersalRule` trait — decides who moves, and where.

use eco_core::{CellId, CellRng, Direction};
use eco_grid::{Cell, Cohort, GridShape};

/// Where an eligible cohort is headed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DispersalDecision {
    /// The cell the cohort will be applied to in dispersal phase 2.
    pub destination: CellId,
    /// The compass side of the source cell the cohort leaves through.
    pub exit: Direction,
}

/// Pluggable dispersal eligibility and destination choice.
///
/// Called during dispersal phase 1 for every cohort in every cell.  The rule
/// reads the cohort and its cell, and either declines (`None`) or names a
/// destination cell and exit direction.  The entry direction at the
/// destination is derived by the engine (`exit.opposite()`).
///
/// Returning the cohort's own cell, or a cell outside the grid, is a contract
/// violation the engine reports as a fatal error — out-of-range moves would
/// silently lose biomass otherwise.
pub trait DispersalRule: Send + Sync {
    fn evaluate(
        &self,
        cohort: &Cohort,
        cell:   &Cell,
        shape:  &GridShape,
        rng:    &mut CellRng,
    ) -> Option<DispersalDecision>;
}
