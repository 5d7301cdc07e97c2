//! Per-solve configuration aggregate (spec §3 `SolveConfig`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

use super::field::InterpolationMode;
use super::solver::CancellationToken;

/// Grid shape, node spacing, departure clock, and interpolation choice
/// for one solve. Consumed by `Route::new_from_config` (grid shape) and
/// `solver::solve` (departure time, interpolation check, cancellation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveConfig {
    pub r: usize,
    pub w: usize,
    pub d_node_m: f64,
    pub departure_time: DateTime<Utc>,
    pub interpolation: InterpolationMode,
    #[serde(skip)]
    pub cancellation: Option<CancellationToken>,
}

impl SolveConfig {
    /// Validates the grid-shape invariants spec §7 requires at
    /// construction: non-empty grid, positive node spacing.
    pub fn new(
        r: usize,
        w: usize,
        d_node_m: f64,
        departure_time: DateTime<Utc>,
        interpolation: InterpolationMode,
    ) -> Result<Self> {
        if r == 0 || w == 0 {
            return Err(RoutingError::EmptyGrid { r, w });
        }
        if d_node_m <= 0.0 {
            return Err(RoutingError::NonPositiveSpacing(d_node_m));
        }
        Ok(Self { r, w, d_node_m, departure_time, interpolation, cancellation: None })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
