//! Grid geometry and the owning population-grid collection.

use eco_core::{CellId, Direction};

use crate::{Cell, GridError, GridResult};

// ── GridShape ─────────────────────────────────────────────────────────────────

/// Geometry of a row-major latitude/longitude grid.
///
/// Row 0 is the northernmost band; column 0 the westernmost.  Longitude wraps
/// around the antimeridian; latitude does not wrap past the poles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
    /// Latitude of the grid's northwest corner (degrees).
    pub origin_lat: f64,
    /// Longitude of the grid's northwest corner (degrees).
    pub origin_lon: f64,
    /// Cell edge length in degrees.
    pub cell_size_deg: f64,
}

impl GridShape {
    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Row-major flat index of `(row, col)`.
    #[inline]
    pub fn cell_id(&self, row: u32, col: u32) -> CellId {
        CellId(row * self.cols + col)
    }

    /// `(row, col)` of a flat index.
    #[inline]
    pub fn coords(&self, cell: CellId) -> (u32, u32) {
        (cell.0 / self.cols, cell.0 % self.cols)
    }

    /// `true` if `cell` addresses a cell inside the grid.
    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        (cell.0 as usize) < self.cell_count()
    }

    /// Centre latitude/longitude of `(row, col)`.
    pub fn centre(&self, row: u32, col: u32) -> (f64, f64) {
        let lat = self.origin_lat - (row as f64 + 0.5) * self.cell_size_deg;
        let lon = self.origin_lon + (col as f64 + 0.5) * self.cell_size_deg;
        (lat, lon)
    }

    /// The cell one step from `cell` in `direction`.
    ///
    /// Longitude wraps; a step past the north or south edge returns `None`.
    pub fn neighbour(&self, cell: CellId, direction: Direction) -> Option<CellId> {
        let (row, col) = self.coords(cell);
        let (dr, dc) = direction.offset();

        let new_row = row as i64 + dr;
        if new_row < 0 || new_row >= self.rows as i64 {
            return None;
        }
        let new_col = (col as i64 + dc).rem_euclid(self.cols as i64);

        Some(self.cell_id(new_row as u32, new_col as u32))
    }
}

// ── PopulationGrid ────────────────────────────────────────────────────────────

/// The full cell collection plus its geometry.
///
/// Cells are stored row-major; `CellId` is the index into `cells`.  During
/// the ecology phase the grid is partitioned by cell: each worker has
/// exclusive write access to its assigned cells and no access elsewhere.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationGrid {
    pub shape: GridShape,

    /// Functional groups every cell is dimensioned for.
    pub group_count: usize,

    /// `true` when the grid is a set of isolated study cells rather than a
    /// contiguous region.  Dispersal is skipped for such grids.
    pub fixed_point_only: bool,

    cells: Vec<Cell>,
}

impl PopulationGrid {
    /// Number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Read-only access to one cell.
    pub fn cell(&self, id: CellId) -> GridResult<&Cell> {
        let count = self.cells.len();
        self.cells.get(id.index()).ok_or(GridError::CellOutOfRange {
            index: id.index(),
            count,
        })
    }

    /// Mutable access to one cell.
    pub fn cell_mut(&mut self, id: CellId) -> GridResult<&mut Cell> {
        let count = self.cells.len();
        self.cells.get_mut(id.index()).ok_or(GridError::CellOutOfRange {
            index: id.index(),
            count,
        })
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells, mutable.  Used by the scheduler to partition work.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterator over `(CellId, &Cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u32), c))
    }

    /// Total cohorts across the whole grid.
    pub fn total_cohorts(&self) -> usize {
        self.cells.iter().map(Cell::cohort_count).sum()
    }

    /// Total stocks across the whole grid.
    pub fn total_stocks(&self) -> usize {
        self.cells.iter().map(Cell::stock_count).sum()
    }

    /// Total biomass across the whole grid (cohorts + stocks + organic
    /// pools).  Conservation audits compare this across phases.
    pub fn total_biomass(&self) -> f64 {
        self.cells.iter().map(Cell::total_biomass).sum()
    }

    /// Reassemble a grid from checkpointed parts.
    ///
    /// Validates that the cell count matches the shape.
    pub fn from_parts(
        shape:            GridShape,
        group_count:      usize,
        fixed_point_only: bool,
        cells:            Vec<Cell>,
    ) -> GridResult<Self> {
        if cells.len() != shape.cell_count() {
            return Err(GridError::CountMismatch {
                expected: shape.cell_count(),
                got:      cells.len(),
                what:     "cells",
            });
        }
        for cell in &cells {
            if cell.group_count() != group_count {
                return Err(GridError::CountMismatch {
                    expected: group_count,
                    got:      cell.group_count(),
                    what:     "functional-group lists",
                });
            }
        }
        Ok(PopulationGrid {
            shape,
            group_count,
            fixed_point_only,
            cells,
        })
    }
}

// ── PopulationGridBuilder ─────────────────────────────────────────────────────

/// Fluent builder for [`PopulationGrid`].
///
/// All cells are allocated empty; environment layers supplied through the
/// builder are installed uniformly or per cell.  Seeding code then writes
/// cohorts, stocks, and any remaining layers directly into the `pub` cell
/// fields before the simulation is built.
///
/// # Example
///
/// ```rust
/// use eco_grid::{GridShape, PopulationGridBuilder, LAYER_ORGANIC_POOL};
///
/// let shape = GridShape {
///     rows: 2, cols: 3,
///     origin_lat: 60.0, origin_lon: -10.0, cell_size_deg: 1.0,
/// };
/// let grid = PopulationGridBuilder::new(shape, 4)
///     .uniform_layer(LAYER_ORGANIC_POOL, 0.0)
///     .build()
///     .unwrap();
/// assert_eq!(grid.cell_count(), 6);
/// ```
pub struct PopulationGridBuilder {
    shape:            GridShape,
    group_count:      usize,
    fixed_point_only: bool,
    uniform_layers:   Vec<(String, f64)>,
    per_cell_layers:  Vec<(String, Vec<f64>)>,
}

impl PopulationGridBuilder {
    /// Create a builder for `shape` with `group_count` functional groups.
    pub fn new(shape: GridShape, group_count: usize) -> Self {
        Self {
            shape,
            group_count,
            fixed_point_only: false,
            uniform_layers:   Vec::new(),
            per_cell_layers:  Vec::new(),
        }
    }

    /// Mark the grid as a set of isolated study cells (no dispersal).
    pub fn fixed_point_only(mut self, fixed: bool) -> Self {
        self.fixed_point_only = fixed;
        self
    }

    /// Install a scalar layer with the same value in every cell.
    pub fn uniform_layer(mut self, name: &str, value: f64) -> Self {
        self.uniform_layers.push((name.to_string(), value));
        self
    }

    /// Install a scalar layer with one value per cell (row-major order).
    /// Must be length `shape.cell_count()`.
    pub fn layer(mut self, name: &str, values: Vec<f64>) -> Self {
        self.per_cell_layers.push((name.to_string(), values));
        self
    }

    /// Validate and allocate the grid.
    pub fn build(self) -> GridResult<PopulationGrid> {
        let cell_count = self.shape.cell_count();

        for (_, values) in &self.per_cell_layers {
            if values.len() != cell_count {
                return Err(GridError::CountMismatch {
                    expected: cell_count,
                    got:      values.len(),
                    what:     "per-cell layer values",
                });
            }
        }

        let mut cells = Vec::with_capacity(cell_count);
        for row in 0..self.shape.rows {
            for col in 0..self.shape.cols {
                let (lat, lon) = self.shape.centre(row, col);
                let mut cell = Cell::empty(row, col, lat, lon, self.group_count);
                for (name, value) in &self.uniform_layers {
                    cell.set_layer(name, vec![*value]);
                }
                let flat = (row * self.shape.cols + col) as usize;
                for (name, values) in &self.per_cell_layers {
                    cell.set_layer(name, vec![values[flat]]);
                }
                cells.push(cell);
            }
        }

        Ok(PopulationGrid {
            shape: self.shape,
            group_count: self.group_count,
            fixed_point_only: self.fixed_point_only,
            cells,
        })
    }
}
