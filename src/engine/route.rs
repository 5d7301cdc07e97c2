//! The immutable per-solve configuration aggregate (spec §3 `Route`).

use crate::error::Result;

use super::config::SolveConfig;
use super::craft::Craft;
use super::grid::Grid;
use super::location::Location;
use super::mask::CoastlineOracle;

pub struct Route {
    pub start: Location,
    pub finish: Location,
    pub craft: Craft,
    grid: Grid,
}

impl Route {
    /// Builds the grid and packages it with the endpoints and craft.
    /// Constructed once per solve (spec §3 lifecycle).
    pub fn new(
        start: Location,
        finish: Location,
        r: usize,
        w: usize,
        d_node_m: f64,
        craft: Craft,
        oracle: &dyn CoastlineOracle,
    ) -> Result<Self> {
        let grid = Grid::build(start, finish, r, w, d_node_m, oracle)?;
        Ok(Self { start, finish, craft, grid })
    }

    /// Builds a route from a `SolveConfig`'s grid shape and spacing.
    pub fn new_from_config(
        start: Location,
        finish: Location,
        craft: Craft,
        oracle: &dyn CoastlineOracle,
        config: &SolveConfig,
    ) -> Result<Self> {
        Self::new(start, finish, config.r, config.w, config.d_node_m, craft, oracle)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
