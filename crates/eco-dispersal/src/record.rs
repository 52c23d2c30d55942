//! Outbound move records produced by dispersal phase 1.

use eco_core::{CellId, Direction, FunctionalGroupId};

/// One planned move, addressed against the source cell's phase-1 state.
///
/// Records hold `(group, position)` rather than the cohort itself so phase 1
/// stays read-only: the cohort is extracted from the source cell during the
/// sequential apply, immediately before insertion at the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRecord {
    /// Functional group of the moving cohort.
    pub group: FunctionalGroupId,

    /// Position of the cohort in its group's list at the source cell.
    pub index: usize,

    /// Source cell.
    pub from: CellId,

    /// Destination cell.
    pub to: CellId,

    /// Compass side of the source cell the cohort leaves through.
    pub exit: Direction,

    /// Compass side of the destination the cohort enters through — always
    /// `exit.opposite()`.
    pub entry: Direction,
}
