//! Time-indexed regridded environmental scalar field (spec §3, §4.6).
//!
//! A field is a pre-regridded (lon x lat x time) array; `at` performs
//! nearest-neighbour or trilinear interpolation and always returns a
//! value — out-of-bounds queries saturate to the nearest in-bounds
//! sample rather than failing, per the §4.6 hard contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

use super::location::Location;

/// Per-instance interpolation choice. Spec §3 requires every
/// `EnvironmentField` used together in one solve to agree on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationMode {
    Nearest,
    Trilinear,
}

#[derive(Debug, Clone)]
pub struct EnvironmentField {
    lon: Vec<f64>,
    lat: Vec<f64>,
    /// Seconds since epoch, strictly ascending.
    time: Vec<i64>,
    /// Row-major `[time][lat][lon]`.
    values: Vec<f64>,
    mode: InterpolationMode,
}

impl EnvironmentField {
    pub fn new(
        lon: Vec<f64>,
        lat: Vec<f64>,
        time: Vec<i64>,
        values: Vec<f64>,
        mode: InterpolationMode,
    ) -> Result<Self> {
        check_ascending("lon", &lon)?;
        check_ascending("lat", &lat)?;
        check_ascending_i64("time", &time)?;
        let expected = lon.len() * lat.len() * time.len();
        if values.len() != expected {
            return Err(RoutingError::MalformedTable(format!(
                "environment field has {} values, expected {lon_len}x{lat_len}x{time_len}={expected}",
                values.len(),
                lon_len = lon.len(),
                lat_len = lat.len(),
                time_len = time.len(),
            )));
        }
        Ok(Self { lon, lat, time, values, mode })
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    fn value(&self, ti: usize, lai: usize, loi: usize) -> f64 {
        let lat_len = self.lat.len();
        let lon_len = self.lon.len();
        self.values[ti * lat_len * lon_len + lai * lon_len + loi]
    }

    /// Queries the field at an arbitrary point; never fails (spec §4.6).
    pub fn at(&self, loc: &Location, t: DateTime<Utc>) -> f64 {
        let t_secs = t.timestamp();
        match self.mode {
            InterpolationMode::Nearest => self.nearest(loc.lon, loc.lat, t_secs),
            InterpolationMode::Trilinear => self.trilinear(loc.lon, loc.lat, t_secs),
        }
    }

    fn nearest(&self, lon: f64, lat: f64, t: i64) -> f64 {
        let loi = nearest_index(&self.lon, lon);
        let lai = nearest_index(&self.lat, lat);
        let ti = nearest_index_i64(&self.time, t);
        self.value(ti, lai, loi)
    }

    fn trilinear(&self, lon: f64, lat: f64, t: i64) -> f64 {
        let (loi0, loi1, lo_frac) = bracket(&self.lon, lon);
        let (lai0, lai1, la_frac) = bracket(&self.lat, lat);
        let (ti0, ti1, t_frac) = bracket_i64(&self.time, t);

        let c000 = self.value(ti0, lai0, loi0);
        let c001 = self.value(ti0, lai0, loi1);
        let c010 = self.value(ti0, lai1, loi0);
        let c011 = self.value(ti0, lai1, loi1);
        let c100 = self.value(ti1, lai0, loi0);
        let c101 = self.value(ti1, lai0, loi1);
        let c110 = self.value(ti1, lai1, loi0);
        let c111 = self.value(ti1, lai1, loi1);

        let c00 = lerp(c000, c001, lo_frac);
        let c01 = lerp(c010, c011, lo_frac);
        let c10 = lerp(c100, c101, lo_frac);
        let c11 = lerp(c110, c111, lo_frac);

        let c0 = lerp(c00, c01, la_frac);
        let c1 = lerp(c10, c11, la_frac);

        lerp(c0, c1, t_frac)
    }
}

fn lerp(a: f64, b: f64, frac: f64) -> f64 {
    a * (1.0 - frac) + b * frac
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

fn check_ascending_i64(axis: &'static str, values: &[i64]) -> Result<()> {
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

/// Clamps `value` into the axis range and returns (lo, hi, fraction).
fn bracket(axis: &[f64], value: f64) -> (usize, usize, f64) {
    let value = value.clamp(axis[0], *axis.last().unwrap());
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

fn bracket_i64(axis: &[i64], value: i64) -> (usize, usize, f64) {
    let value = value.clamp(axis[0], *axis.last().unwrap());
    if axis.len() == 1 {
        return (0, 0, 0.0);
    }
    for i in 0..axis.len() - 1 {
        if value >= axis[i] && value <= axis[i + 1] {
            let span = (axis[i + 1] - axis[i]) as f64;
            let frac = if span == 0.0 { 0.0 } else { (value - axis[i]) as f64 / span };
            return (i, i + 1, frac);
        }
    }
    let last = axis.len() - 1;
    (last, last, 0.0)
}

fn nearest_index(axis: &[f64], value: f64) -> usize {
    let value = value.clamp(axis[0], *axis.last().unwrap());
    axis.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(i, _)| i)
        .unwrap()
}

fn nearest_index_i64(axis: &[i64], value: i64) -> usize {
    let value = value.clamp(axis[0], *axis.last().unwrap());
    axis.iter()
        .enumerate()
        .min_by_key(|(_, a)| (*a - value).abs())
        .map(|(i, _)| i)
        .unwrap()
}
