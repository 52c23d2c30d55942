//! `eco-grid` — population state on a spatial grid.
//!
//! The grid owns everything a timestep mutates: per-cell cohort lists, stock
//! lists, and named environment layers.  Each cell is an independent unit of
//! parallel work — a worker holding `&mut Cell` may freely mutate that cell's
//! contents but never touches another cell except through the dispersal
//! protocol in `eco-dispersal`.
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`cohort`] | `Cohort`, `CohortSpec` — agent groups with lineage    |
//! | [`stock`]  | `Stock` — non-agent biomass pools                     |
//! | [`cell`]   | `Cell` — one grid square and its environment layers   |
//! | [`grid`]   | `GridShape`, `PopulationGrid` + builder               |
//! | [`error`]  | `GridError`, `GridResult`                             |

pub mod cell;
pub mod cohort;
pub mod error;
pub mod grid;
pub mod stock;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{
    Cell, LAYER_AREA, LAYER_ORGANIC_POOL, LAYER_REALM, LAYER_SCENARIO_MASK,
};
pub use cohort::{Cohort, CohortSpec};
pub use error::{GridError, GridResult};
pub use grid::{GridShape, PopulationGrid, PopulationGridBuilder};
pub use stock::Stock;
