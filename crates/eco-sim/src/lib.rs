//! `eco-sim` — the top-level simulation driver.
//!
//! # Crate layout
//!
//! | Module          | Contents                                             |
//! |-----------------|------------------------------------------------------|
//! | [`diagnostics`] | Per-timestep and whole-run diagnostic counters       |
//! | [`scheduler`]   | `run_timestep` — sequential or worker-pool execution |
//! | [`checkpoint`]  | `ModelState` — the serializable full-state snapshot  |
//! | [`observer`]    | `OutputDriver` trait + `NoopOutput`                  |
//! | [`sim`]         | `Simulation` run loop with cooperative cancellation  |
//! | [`builder`]     | `SimulationBuilder` with pre-run validation          |
//! | [`error`]       | `SimError`, `SimResult<T>`                           |
//!
//! # Timestep anatomy
//!
//! 1. **Scenario impacts** (external): temperature and harvesting applied per
//!    cell, before any ecology.
//! 2. **Ecology** ([`scheduler::run_timestep`]): every cell processed
//!    independently — permuted actor order, ecology callback, extinction
//!    sweep, compaction.  Optionally on Rayon workers over disjoint cell
//!    subsets.
//! 3. **Dispersal** (`eco-dispersal`): skipped entirely for fixed-point-only
//!    grids.
//! 4. **Checkpoint + outputs**: a `ModelState` is captured and handed to the
//!    output driver; year boundaries additionally close out a year artifact.
//!
//! Cancellation is checked at the start of each timestep and between the two
//! dispersal phases; a cancelled run finalizes outputs (`end_run` exactly
//! once) and stops without rolling anything back.

pub mod builder;
pub mod checkpoint;
pub mod diagnostics;
pub mod error;
pub mod observer;
pub mod scheduler;
pub mod sim;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimulationBuilder;
pub use checkpoint::ModelState;
pub use diagnostics::{GlobalDiagnostics, TimestepDiagnostics};
pub use error::{SimError, SimResult};
pub use observer::{NoopOutput, OutputDriver};
pub use sim::{RunState, Simulation};
