//! `eco-dispersal` — cross-cell movement of cohorts.
//!
//! # Why two phases
//!
//! Cells are processed in parallel and in no particular order, so a cohort
//! entering cell B from cell A must never race with B's own mutation, and no
//! cell may ever observe a half-updated neighbour.  Dispersal therefore
//! splits into:
//!
//! 1. **Phase 1 (parallel-safe)** — each cell consults the dispersal rule for
//!    its own cohorts and fills its own outbound list.  Nothing is mutated;
//!    no other cell is even read mutably.
//! 2. **Phase 2 (sequential)** — every outbound record is applied to its
//!    destination in fixed order: merge into a matching cohort if one exists,
//!    insert otherwise.  One sequential pass removes the need for any
//!    per-cell locking.
//!
//! Cancellation is honoured only between the phases, never mid-phase: a
//! cancelled engine leaves the grid exactly as phase 1 found it.

pub mod engine;
pub mod error;
pub mod record;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{DispersalEngine, DispersalOutcome};
pub use error::{DispersalError, DispersalResult};
pub use record::OutboundRecord;
