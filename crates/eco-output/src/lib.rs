//! `eco-output` — output-driver backends.
//!
//! The simulation core reports through the `OutputDriver` trait in `eco-sim`;
//! this crate provides the concrete backends.  Only the per-timestep
//! diagnostics CSV lives here — richer on-disk state writers and live-view
//! tooling are host concerns, wired up through the same trait.

pub mod csv;
pub mod error;
pub mod row;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use crate::csv::CsvDiagnosticsWriter;
pub use error::{OutputError, OutputResult};
pub use row::DiagnosticsRow;
