//! Error types for eco-cell.

use eco_core::{CellId, FunctionalGroupId};
use eco_grid::GridError;
use thiserror::Error;

/// Errors raised during within-cell processing.
///
/// Everything here is fatal for the timestep: these are collaborator bugs or
/// impossible configurations, not recoverable conditions.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ecology left cohort {group}[{index}] in cell {cell} invalid: {source}")]
    ContractViolation {
        cell:  CellId,
        group: FunctionalGroupId,
        index: usize,
        #[source]
        source: GridError,
    },

    #[error("ecology produced an invalid offspring spec in cell {cell}: {source}")]
    BadOffspring {
        cell: CellId,
        #[source]
        source: GridError,
    },

    #[error("offspring spec in cell {cell} names unknown functional group {group}")]
    UnknownGroup { cell: CellId, group: FunctionalGroupId },

    #[error("compaction stalled at {remaining} cohorts (budget {target}): no candidate pair within tolerance")]
    CompactionStalled { remaining: usize, target: usize },

    #[error(transparent)]
    Cell(#[from] GridError),
}

/// Alias for `Result<T, EngineError>`.
pub type CellResult<T> = Result<T, EngineError>;
