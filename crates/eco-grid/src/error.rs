//! Error types for eco-grid.
//!
//! Invariant violations (negative mass, empty lineage) are modelled as errors
//! rather than clamped, so a buggy collaborator fails the timestep instead of
//! silently corrupting state.

use thiserror::Error;

/// Errors raised by grid state manipulation and validation.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) has no environment layer {layer:?}")]
    LayerMissing { row: u32, col: u32, layer: String },

    #[error("layer {layer:?} in cell ({row}, {col}) has {len} entries; index {index} requested")]
    LayerIndexOutOfRange {
        row:   u32,
        col:   u32,
        layer: String,
        index: usize,
        len:   usize,
    },

    #[error("cell ({row}, {col}) realm layer holds unrecognized code {value}")]
    UnknownRealmValue { row: u32, col: u32, value: f64 },

    #[error("negative {what}: {value}")]
    NegativeMass { what: &'static str, value: f64 },

    #[error("negative abundance: {0}")]
    NegativeAbundance(f64),

    #[error("cohort lineage set is empty")]
    EmptyLineage,

    #[error("cell index {index} out of range for a grid of {count} cells")]
    CellOutOfRange { index: usize, count: usize },

    #[error("expected {expected} {what}, got {got}")]
    CountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },
}

/// Alias for `Result<T, GridError>`.
pub type GridResult<T> = Result<T, GridError>;
