//! One grid cell: cohort lists, stock lists, and environment layers.

use std::collections::BTreeMap;

use eco_core::{FunctionalGroupId, Realm};

use crate::{Cohort, GridError, GridResult, Stock};

/// Layer holding the cell's organic-matter pool (g).  Extinction deposits
/// dead biomass here so mass is relocated, never destroyed.
pub const LAYER_ORGANIC_POOL: &str = "organic pool";

/// Layer encoding the cell's realm (1.0 = terrestrial, 2.0 = marine).
pub const LAYER_REALM: &str = "realm";

/// Layer holding the cell's area in km².
pub const LAYER_AREA: &str = "cell area";

/// Optional 0/1 mask restricting which cells scenario impacts apply to.
/// Cells without this layer count as affected.
pub const LAYER_SCENARIO_MASK: &str = "scenario mask";

/// One square of the population grid.
///
/// Environment layers are kept in a `BTreeMap` so checkpoint serialization is
/// deterministic: two captures of identical state are byte-identical.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Grid row, counting north → south.
    pub row: u32,
    /// Grid column, counting west → east.
    pub col: u32,
    /// Latitude of the cell centre (degrees).
    pub lat: f64,
    /// Longitude of the cell centre (degrees).
    pub lon: f64,

    /// Cohort lists indexed by functional group.
    pub cohorts: Vec<Vec<Cohort>>,

    /// Stock lists indexed by functional group.
    pub stocks: Vec<Vec<Stock>>,

    /// Named environment layers.  Most layers hold one value; time-varying
    /// layers (e.g. monthly temperature) hold one value per within-year step.
    pub environment: BTreeMap<String, Vec<f64>>,
}

impl Cell {
    /// Construct an empty cell with `group_count` cohort and stock lists.
    pub(crate) fn empty(row: u32, col: u32, lat: f64, lon: f64, group_count: usize) -> Self {
        Cell {
            row,
            col,
            lat,
            lon,
            cohorts: vec![Vec::new(); group_count],
            stocks: vec![Vec::new(); group_count],
            environment: BTreeMap::new(),
        }
    }

    // ── Collection accessors ──────────────────────────────────────────────

    /// Number of functional groups the cell is dimensioned for.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.cohorts.len()
    }

    /// Total cohorts across all functional groups.
    pub fn cohort_count(&self) -> usize {
        self.cohorts.iter().map(Vec::len).sum()
    }

    /// Total stocks across all functional groups.
    pub fn stock_count(&self) -> usize {
        self.stocks.iter().map(Vec::len).sum()
    }

    /// Append a cohort to its functional group's list.
    #[inline]
    pub fn push_cohort(&mut self, group: FunctionalGroupId, cohort: Cohort) {
        self.cohorts[group.index()].push(cohort);
    }

    /// Iterator over `(group, cohort)` pairs in group then list order.
    pub fn iter_cohorts(&self) -> impl Iterator<Item = (FunctionalGroupId, &Cohort)> + '_ {
        self.cohorts.iter().enumerate().flat_map(|(g, list)| {
            list.iter().map(move |c| (FunctionalGroupId(g as u16), c))
        })
    }

    // ── Environment layers ────────────────────────────────────────────────

    /// Read-only slice of layer `name`.  Missing layers are an error; use
    /// [`env_value_or`][Self::env_value_or] at the few sites that tolerate
    /// absence.
    pub fn env(&self, name: &str) -> GridResult<&[f64]> {
        self.environment
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GridError::LayerMissing {
                row:   self.row,
                col:   self.col,
                layer: name.to_string(),
            })
    }

    /// Entry `index` of layer `name` (for time-varying layers).
    pub fn env_at(&self, name: &str, index: usize) -> GridResult<f64> {
        let values = self.env(name)?;
        values
            .get(index)
            .copied()
            .ok_or_else(|| GridError::LayerIndexOutOfRange {
                row:   self.row,
                col:   self.col,
                layer: name.to_string(),
                index,
                len:   values.len(),
            })
    }

    /// First entry of layer `name` — the common case for scalar layers.
    pub fn env_value(&self, name: &str) -> GridResult<f64> {
        self.env_at(name, 0)
    }

    /// Tolerant scalar read: `default` when the layer is absent or empty.
    pub fn env_value_or(&self, name: &str, default: f64) -> f64 {
        self.env_value(name).unwrap_or(default)
    }

    /// Install or replace layer `name`.
    pub fn set_layer(&mut self, name: &str, values: Vec<f64>) {
        self.environment.insert(name.to_string(), values);
    }

    /// Add `mass` grams to the cell's organic-matter pool.
    ///
    /// The pool layer must exist: extinction must never destroy mass, so a
    /// cell without the pool cannot absorb dead biomass and the sweep fails.
    pub fn deposit_organic_mass(&mut self, mass: f64) -> GridResult<()> {
        let (row, col) = (self.row, self.col);
        let pool = self
            .environment
            .get_mut(LAYER_ORGANIC_POOL)
            .and_then(|v| v.first_mut())
            .ok_or_else(|| GridError::LayerMissing {
                row,
                col,
                layer: LAYER_ORGANIC_POOL.to_string(),
            })?;
        *pool += mass;
        Ok(())
    }

    // ── Decoded layers ────────────────────────────────────────────────────

    /// The cell's realm, decoded from the realm layer.
    pub fn realm(&self) -> GridResult<Realm> {
        let value = self.env_value(LAYER_REALM)?;
        Realm::from_layer_value(value).ok_or(GridError::UnknownRealmValue {
            row: self.row,
            col: self.col,
            value,
        })
    }

    /// The cell's area in km².
    pub fn area_km2(&self) -> GridResult<f64> {
        self.env_value(LAYER_AREA)
    }

    // ── Audit ─────────────────────────────────────────────────────────────

    /// Total biomass in the cell: cohorts + stocks + organic pool.
    ///
    /// Conserved (within floating-point tolerance) across extinction sweeps,
    /// compaction, and dispersal application.
    pub fn total_biomass(&self) -> f64 {
        let cohort_mass: f64 = self
            .cohorts
            .iter()
            .flatten()
            .map(Cohort::total_biomass)
            .sum();
        let stock_mass: f64 = self.stocks.iter().flatten().map(|s| s.total_biomass).sum();
        let pool = self.env_value_or(LAYER_ORGANIC_POOL, 0.0);
        cohort_mass + stock_mass + pool
    }
}
