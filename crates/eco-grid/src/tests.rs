//! Unit tests for grid state types.

use std::collections::BTreeSet;

use eco_core::{CellId, CohortId, Direction, FunctionalGroupId, Realm, Timestep};

use crate::{
    Cell, Cohort, CohortSpec, GridError, GridShape, PopulationGridBuilder, Stock,
    LAYER_AREA, LAYER_ORGANIC_POOL, LAYER_REALM,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn spec(group: u16, body: f64, abundance: f64) -> CohortSpec {
    CohortSpec {
        group: FunctionalGroupId(group),
        juvenile_mass: body * 0.1,
        adult_mass: body,
        body_mass: body,
        abundance,
        proportion_time_active: 0.5,
        trophic_index: 2.0,
        log_optimal_prey_size_ratio: 0.0,
    }
}

fn small_shape() -> GridShape {
    GridShape {
        rows: 2,
        cols: 3,
        origin_lat: 60.0,
        origin_lon: -10.0,
        cell_size_deg: 1.0,
    }
}

// ── Cohort ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cohort {
    use super::*;

    #[test]
    fn founder_lineage_is_own_id() {
        let c = Cohort::founder(CohortId(7), Timestep(3), &spec(0, 10.0, 100.0));
        assert_eq!(c.lineage, BTreeSet::from([CohortId(7)]));
        assert!(!c.merged);
        assert!(!c.is_mature());
        assert_eq!(c.birth_timestep, Timestep(3));
        assert_eq!(c.max_body_mass, 10.0);
    }

    #[test]
    fn total_biomass_includes_reproductive_mass() {
        let mut c = Cohort::founder(CohortId(0), Timestep(0), &spec(0, 10.0, 4.0));
        c.reproductive_mass = 2.0;
        assert_eq!(c.total_biomass(), (10.0 + 2.0) * 4.0);
    }

    #[test]
    fn validate_accepts_well_formed() {
        let c = Cohort::founder(CohortId(0), Timestep(0), &spec(0, 10.0, 1.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_mass() {
        let mut c = Cohort::founder(CohortId(0), Timestep(0), &spec(0, 10.0, 1.0));
        c.body_mass = -1e-9;
        assert!(matches!(c.validate(), Err(GridError::NegativeMass { .. })));
    }

    #[test]
    fn validate_rejects_negative_abundance() {
        let mut c = Cohort::founder(CohortId(0), Timestep(0), &spec(0, 10.0, 1.0));
        c.abundance = -0.5;
        assert!(matches!(c.validate(), Err(GridError::NegativeAbundance(_))));
    }

    #[test]
    fn validate_rejects_empty_lineage() {
        let mut c = Cohort::founder(CohortId(0), Timestep(0), &spec(0, 10.0, 1.0));
        c.lineage.clear();
        assert!(matches!(c.validate(), Err(GridError::EmptyLineage)));
    }

    #[test]
    fn spec_validation() {
        assert!(spec(0, 10.0, 5.0).validate().is_ok());
        let mut bad = spec(0, 10.0, 5.0);
        bad.abundance = -1.0;
        assert!(bad.validate().is_err());
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cell {
    use super::*;

    fn one_cell() -> Cell {
        let grid = PopulationGridBuilder::new(small_shape(), 2)
            .uniform_layer(LAYER_ORGANIC_POOL, 100.0)
            .uniform_layer(LAYER_REALM, 1.0)
            .uniform_layer(LAYER_AREA, 10_000.0)
            .build()
            .unwrap();
        grid.cell(CellId(0)).unwrap().clone()
    }

    #[test]
    fn deposit_adds_to_pool() {
        let mut cell = one_cell();
        cell.deposit_organic_mass(50.0).unwrap();
        assert_eq!(cell.env_value(LAYER_ORGANIC_POOL).unwrap(), 150.0);
    }

    #[test]
    fn deposit_without_pool_fails() {
        let mut cell = one_cell();
        cell.environment.remove(LAYER_ORGANIC_POOL);
        assert!(matches!(
            cell.deposit_organic_mass(1.0),
            Err(GridError::LayerMissing { .. })
        ));
    }

    #[test]
    fn realm_decodes() {
        let mut cell = one_cell();
        assert_eq!(cell.realm().unwrap(), Realm::Terrestrial);
        cell.set_layer(LAYER_REALM, vec![2.0]);
        assert_eq!(cell.realm().unwrap(), Realm::Marine);
        cell.set_layer(LAYER_REALM, vec![9.0]);
        assert!(matches!(cell.realm(), Err(GridError::UnknownRealmValue { .. })));
    }

    #[test]
    fn env_index_bounds_checked() {
        let cell = one_cell();
        assert!(matches!(
            cell.env_at(LAYER_REALM, 5),
            Err(GridError::LayerIndexOutOfRange { .. })
        ));
        assert!(matches!(
            cell.env("snow depth"),
            Err(GridError::LayerMissing { .. })
        ));
    }

    #[test]
    fn env_value_or_tolerates_absence() {
        let cell = one_cell();
        assert_eq!(cell.env_value_or("snow depth", 7.0), 7.0);
        assert_eq!(cell.env_value_or(LAYER_AREA, 7.0), 10_000.0);
    }

    #[test]
    fn total_biomass_sums_all_pools() {
        let mut cell = one_cell();
        cell.push_cohort(
            FunctionalGroupId(0),
            Cohort::founder(CohortId(0), Timestep(0), &spec(0, 10.0, 3.0)),
        );
        cell.stocks[1].push(Stock::new(1e-3, 500.0));
        // 100 (pool) + 30 (cohort) + 500 (stock)
        assert!((cell.total_biomass() - 630.0).abs() < 1e-9);
    }

    #[test]
    fn cohort_count_spans_groups() {
        let mut cell = one_cell();
        cell.push_cohort(
            FunctionalGroupId(0),
            Cohort::founder(CohortId(0), Timestep(0), &spec(0, 1.0, 1.0)),
        );
        cell.push_cohort(
            FunctionalGroupId(1),
            Cohort::founder(CohortId(1), Timestep(0), &spec(1, 2.0, 1.0)),
        );
        assert_eq!(cell.cohort_count(), 2);
        assert_eq!(cell.iter_cohorts().count(), 2);
    }
}

// ── GridShape ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod shape {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let shape = small_shape();
        assert_eq!(shape.cell_count(), 6);
        assert_eq!(shape.cell_id(0, 0), CellId(0));
        assert_eq!(shape.cell_id(1, 2), CellId(5));
        assert_eq!(shape.coords(CellId(4)), (1, 1));
    }

    #[test]
    fn centres_move_south_and_east() {
        let shape = small_shape();
        let (lat0, lon0) = shape.centre(0, 0);
        let (lat1, lon1) = shape.centre(1, 1);
        assert!(lat1 < lat0);
        assert!(lon1 > lon0);
        assert_eq!((lat0, lon0), (59.5, -9.5));
    }

    #[test]
    fn neighbour_cardinal_moves() {
        let shape = small_shape();
        let centre = shape.cell_id(0, 1);
        assert_eq!(shape.neighbour(centre, Direction::East), Some(CellId(2)));
        assert_eq!(shape.neighbour(centre, Direction::South), Some(CellId(4)));
        // Off the north edge.
        assert_eq!(shape.neighbour(centre, Direction::North), None);
    }

    #[test]
    fn longitude_wraps_latitude_does_not() {
        let shape = small_shape();
        let east_edge = shape.cell_id(1, 2);
        assert_eq!(shape.neighbour(east_edge, Direction::East), Some(shape.cell_id(1, 0)));
        let west_edge = shape.cell_id(1, 0);
        assert_eq!(shape.neighbour(west_edge, Direction::West), Some(shape.cell_id(1, 2)));
        assert_eq!(shape.neighbour(west_edge, Direction::South), None);
    }
}

// ── PopulationGrid ────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use super::*;

    #[test]
    fn builder_installs_layers() {
        let grid = PopulationGridBuilder::new(small_shape(), 3)
            .uniform_layer(LAYER_ORGANIC_POOL, 0.0)
            .layer(LAYER_AREA, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .build()
            .unwrap();
        assert_eq!(grid.cell(CellId(0)).unwrap().area_km2().unwrap(), 1.0);
        assert_eq!(grid.cell(CellId(5)).unwrap().area_km2().unwrap(), 6.0);
        assert_eq!(grid.cell(CellId(2)).unwrap().group_count(), 3);
    }

    #[test]
    fn builder_rejects_wrong_layer_length() {
        let result = PopulationGridBuilder::new(small_shape(), 1)
            .layer(LAYER_AREA, vec![1.0, 2.0]) // 6 cells expected
            .build();
        assert!(matches!(result, Err(GridError::CountMismatch { .. })));
    }

    #[test]
    fn fixed_point_flag_carries() {
        let grid = PopulationGridBuilder::new(small_shape(), 1)
            .fixed_point_only(true)
            .build()
            .unwrap();
        assert!(grid.fixed_point_only);
    }

    #[test]
    fn from_parts_validates_counts() {
        let grid = PopulationGridBuilder::new(small_shape(), 2).build().unwrap();
        let cells = grid.cells().to_vec();
        assert!(crate::PopulationGrid::from_parts(small_shape(), 2, false, cells.clone()).is_ok());
        assert!(crate::PopulationGrid::from_parts(small_shape(), 2, false, cells[..3].to_vec()).is_err());
        assert!(crate::PopulationGrid::from_parts(small_shape(), 5, false, cells).is_err());
    }

    #[test]
    fn grid_totals() {
        let mut grid = PopulationGridBuilder::new(small_shape(), 1)
            .uniform_layer(LAYER_ORGANIC_POOL, 10.0)
            .build()
            .unwrap();
        grid.cell_mut(CellId(1)).unwrap().push_cohort(
            FunctionalGroupId(0),
            Cohort::founder(CohortId(0), Timestep(0), &spec(0, 5.0, 2.0)),
        );
        grid.cell_mut(CellId(2)).unwrap().stocks[0].push(Stock::new(1.0, 40.0));
        assert_eq!(grid.total_cohorts(), 1);
        assert_eq!(grid.total_stocks(), 1);
        // 6 cells × 10 pool + 10 cohort + 40 stock
        assert!((grid.total_biomass() - 110.0).abs() < 1e-9);
    }
}
