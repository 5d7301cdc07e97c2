//! Curvilinear grid builder (spec §4.1), grounded in the teacher's
//! `IsochroneRouter::calculate_bearing`/`calculate_destination` stepping
//! pattern and the original `grid_locations.py` rank/perpendicular-line
//! construction.

use crate::error::{Result, RoutingError};

use super::geo_math::{bearing_deg, destination, distance_nm, KM_TO_NM};
use super::location::Location;
use super::mask::CoastlineOracle;

/// One grid cell: its location and whether it lies over land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub location: Location,
    pub is_land: bool,
}

/// A rank-ordered `r x w` matrix of cells (spec §3). Rank 0 is nearest
/// `start`, rank `r-1` nearest `finish`.
#[derive(Debug, Clone)]
pub struct Grid {
    r: usize,
    w: usize,
    cells: Vec<GridCell>,
}

impl Grid {
    /// Builds the grid between `start` and `finish`: `r` ranks, `w` nodes
    /// per rank, inter-node spacing `d_node` meters (spec §4.1).
    pub fn build(
        start: Location,
        finish: Location,
        r: usize,
        w: usize,
        d_node_m: f64,
        oracle: &dyn CoastlineOracle,
    ) -> Result<Self> {
        if r == 0 || w == 0 {
            return Err(RoutingError::EmptyGrid { r, w });
        }
        if d_node_m <= 0.0 {
            return Err(RoutingError::NonPositiveSpacing(d_node_m));
        }
        if start == finish {
            return Err(RoutingError::CoincidentEndpoints(start));
        }

        let total_dist_m = distance_nm(&start, &finish) / KM_TO_NM * 1000.0;
        let step_m = total_dist_m / (r + 1) as f64;

        let mut cells = Vec::with_capacity(r * w);
        let mut cursor = start;
        for _rank in 0..r {
            let rank_bearing = bearing_deg(&cursor, &finish);
            cursor = destination(&cursor, step_m, rank_bearing);
            let perp_bearing = (rank_bearing + 90.0) % 360.0;

            for i in 0..w {
                let offset = (i as f64 - (w as f64 - 1.0) / 2.0) * d_node_m;
                let node = if offset >= 0.0 {
                    destination(&cursor, offset, perp_bearing)
                } else {
                    destination(&cursor, -offset, (perp_bearing + 180.0) % 360.0)
                };
                let is_land = oracle.is_land(&node);
                cells.push(GridCell { location: node, is_land });
            }
        }

        Ok(Self { r, w, cells })
    }

    pub fn ranks(&self) -> usize {
        self.r
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn cell(&self, rank: usize, width: usize) -> &GridCell {
        &self.cells[rank * self.w + width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::mask::RoaringLandMask;

    #[test]
    fn builds_r_by_w_grid_with_no_land() {
        let start = Location::new(-2.37, 50.256);
        let finish = Location::new(-61.777, 17.038);
        let oracle = RoaringLandMask::empty();
        let grid = Grid::build(start, finish, 10, 8, 4000.0, &oracle).unwrap();
        assert_eq!(grid.ranks(), 10);
        assert_eq!(grid.width(), 8);
        for r in 0..10 {
            for w in 0..8 {
                assert!(!grid.cell(r, w).is_land);
            }
        }
    }

    #[test]
    fn rejects_coincident_endpoints() {
        let p = Location::new(0.0, 0.0);
        let oracle = RoaringLandMask::empty();
        assert!(Grid::build(p, p, 4, 4, 1000.0, &oracle).is_err());
    }

    #[test]
    fn rejects_empty_dimensions() {
        let oracle = RoaringLandMask::empty();
        let start = Location::new(0.0, 0.0);
        let finish = Location::new(1.0, 1.0);
        assert!(Grid::build(start, finish, 0, 4, 1000.0, &oracle).is_err());
        assert!(Grid::build(start, finish, 4, 0, 1000.0, &oracle).is_err());
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let oracle = RoaringLandMask::empty();
        let start = Location::new(0.0, 0.0);
        let finish = Location::new(1.0, 1.0);
        assert!(Grid::build(start, finish, 4, 4, 0.0, &oracle).is_err());
    }

    #[test]
    fn degenerate_single_rank_and_width_are_well_defined() {
        let start = Location::new(0.0, 0.0);
        let finish = Location::new(1.0, 0.0);
        let oracle = RoaringLandMask::empty();
        let grid = Grid::build(start, finish, 1, 1, 500.0, &oracle).unwrap();
        assert_eq!(grid.ranks(), 1);
        assert_eq!(grid.width(), 1);
    }

    #[test]
    fn marks_nodes_inside_land_box() {
        let start = Location::new(-5.0, 50.0);
        let finish = Location::new(5.0, 50.0);
        let mut mask = RoaringLandMask::empty();
        mask.add_land_box(-1.0, 1.0, 49.0, 51.0);
        let grid = Grid::build(start, finish, 5, 5, 50_000.0, &mask).unwrap();
        let any_land = (0..5).any(|r| (0..5).any(|w| grid.cell(r, w).is_land));
        assert!(any_land, "grid should intersect the land box near the midpoint");
    }
}
