//! Error types for eco-dispersal.

use eco_core::CellId;
use eco_grid::GridError;
use thiserror::Error;

/// Errors raised by the dispersal engine.
///
/// Bad destinations are contract violations by the dispersal rule: applying
/// them would silently lose biomass, so they fail the timestep instead.
#[derive(Debug, Error)]
pub enum DispersalError {
    #[error("dispersal rule sent a cohort from cell {from} to out-of-range cell {to}")]
    DestinationOutOfRange { from: CellId, to: CellId },

    #[error("dispersal rule sent a cohort from cell {0} to itself")]
    SelfDispersal(CellId),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Alias for `Result<T, DispersalError>`.
pub type DispersalResult<T> = Result<T, DispersalError>;
