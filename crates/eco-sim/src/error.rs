//! Error types for eco-sim.

use eco_cell::EngineError;
use eco_core::EcoError;
use eco_dispersal::DispersalError;
use eco_grid::GridError;
use thiserror::Error;

/// Errors raised by simulation construction and the run loop.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("grid is dimensioned for {grid} functional groups but the catalogue defines {catalogue}")]
    GroupCountMismatch { grid: usize, catalogue: usize },

    #[error("checkpoint version {found} not supported (expected {expected})")]
    StateVersionMismatch { expected: u32, found: u32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] EcoError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Dispersal(#[from] DispersalError),
}

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;
