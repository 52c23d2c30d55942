//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into `EcoError`
//! via `From` impls, or keep them separate and wrap `EcoError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::CellId;

/// The top-level error type for `eco-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EcoError {
    #[error("cell {0} not found")]
    CellNotFound(CellId),

    #[error("unrecognized realm filter {0:?} (expected \"all\", \"terrestrial\", or \"marine\")")]
    UnknownRealmFilter(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `eco-*` crates.
pub type EcoResult<T> = Result<T, EcoError>;
