//! Polar performance table: bilinear boat-speed lookup over TWA x TWS.
//!
//! Grounded in the teacher's `parsers::polars::PolarData`, generalized with
//! construction-time validation (spec §3 invariant: strictly ascending axes)
//! and the deterministic `perf_factor` derating named in spec §4.2.

use crate::error::{Result, RoutingError};

/// Immutable boat-speed table, indexed `speed[twa_idx][tws_idx]`.
#[derive(Debug, Clone)]
pub struct Polar {
    tws: Vec<f64>,
    twa: Vec<f64>,
    speed: Vec<Vec<f64>>,
    perf_factor: f64,
}

impl Polar {
    /// Builds a polar table, validating the invariants named in spec §3.
    pub fn new(twa: Vec<f64>, tws: Vec<f64>, speed: Vec<Vec<f64>>, perf_factor: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&perf_factor) {
            return Err(RoutingError::OutOfUnitRange(perf_factor));
        }
        check_ascending("twa", &twa)?;
        check_ascending("tws", &tws)?;
        if speed.len() != twa.len() || speed.iter().any(|row| row.len() != tws.len()) {
            return Err(RoutingError::MismatchedTable {
                rows: speed.len(),
                cols: speed.first().map_or(0, Vec::len),
                twa_len: twa.len(),
                tws_len: tws.len(),
            });
        }
        if speed.iter().flatten().any(|&v| v < 0.0) {
            return Err(RoutingError::MalformedTable(
                "boat speed entries must be non-negative".into(),
            ));
        }
        Ok(Self { tws, twa, speed, perf_factor })
    }

    /// Bilinear-interpolated boat speed (knots) at the given absolute
    /// relative wind angle and true wind speed, clamped to the table's
    /// domain and scaled by `perf_factor`. Total: never fails.
    pub fn speed_at(&self, twa_rel: f64, tws: f64) -> f64 {
        let twa_rel = twa_rel.abs().clamp(self.twa[0], *self.twa.last().unwrap());
        let tws = tws.clamp(self.tws[0], *self.tws.last().unwrap());

        let (twa_lo, twa_hi, twa_frac) = bracket(&self.twa, twa_rel);
        let (tws_lo, tws_hi, tws_frac) = bracket(&self.tws, tws);

        let v00 = self.speed[twa_lo][tws_lo];
        let v01 = self.speed[twa_lo][tws_hi];
        let v10 = self.speed[twa_hi][tws_lo];
        let v11 = self.speed[twa_hi][tws_hi];

        let v0 = v00 * (1.0 - tws_frac) + v01 * tws_frac;
        let v1 = v10 * (1.0 - tws_frac) + v11 * tws_frac;
        let v = v0 * (1.0 - twa_frac) + v1 * twa_frac;

        v * self.perf_factor
    }

    pub fn perf_factor(&self) -> f64 {
        self.perf_factor
    }

    /// Returns a copy of this table with a different `perf_factor`.
    pub fn with_perf_factor(&self, perf_factor: f64) -> Result<Self> {
        Self::new(self.twa.clone(), self.tws.clone(), self.speed.clone(), perf_factor)
    }
}

fn check_ascending(axis: &'static str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(RoutingError::NonAscendingAxis { axis, index: 0 });
    }
    for (i, pair) in values.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(RoutingError::NonAscendingAxis { axis, index: i + 1 });
        }
    }
    Ok(())
}

/// Returns (lower index, upper index, fraction in [0,1]) bracketing `value`
/// in a strictly ascending, already-clamped axis.
fn bracket(axis: &[f64], value: f64) -> (usize, usize, f64) {
    if axis.len() == 1 {
        return (0, 0, 0.0);
    }
    for i in 0..axis.len() - 1 {
        if value >= axis[i] && value <= axis[i + 1] {
            let span = axis[i + 1] - axis[i];
            let frac = if span == 0.0 { 0.0 } else { (value - axis[i]) / span };
            return (i, i + 1, frac);
        }
    }
    let last = axis.len() - 1;
    (last, last, 0.0)
}
