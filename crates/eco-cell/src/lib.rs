//! `eco-cell` — everything that happens inside one grid cell during one
//! timestep.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`ordering`]  | `OrderingPolicy` and the action-order permutation      |
//! | [`engine`]    | `run_cell` — the per-cell processing pass              |
//! | [`extinction`]| The extinction sweep                                   |
//! | [`compactor`] | Cohort merging under the per-cell budget               |
//! | [`error`]     | `EngineError`, `CellResult<T>`                         |
//!
//! # Design notes
//!
//! A cell runs to completion once started: there are no suspension points
//! inside `run_cell`, and the pass touches no state outside its cell except
//! the shared ID counter and the tracker sinks (both designed for concurrent
//! use).  That is what makes cells safe units of parallel work for the
//! scheduler.

pub mod compactor;
pub mod engine;
pub mod error;
pub mod extinction;
pub mod ordering;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use compactor::{compact_cohorts, merge_distance, merge_into, within_tolerance, MergeTolerance};
pub use engine::{run_cell, CellOutcome, EngineSettings};
pub use error::{CellResult, EngineError};
pub use extinction::extinction_sweep;
pub use ordering::{action_order, OrderingPolicy};
