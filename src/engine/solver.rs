//! The layered isochronal solver (spec §4.5) — the core of the core.
//!
//! Strictly layered: rank 0 is seeded from `start`, ranks `1..R-1` are
//! relaxed from the previous rank, and a terminal relaxation reaches
//! `finish`. There is no cross-rank back edge. Per spec §5, rank r+1 is
//! only written after rank r is fully read, so each rank's relaxation is
//! computed as a data-parallel batch (via rayon) and reduced into the
//! next rank sequentially, in increasing node order, which also gives
//! the deterministic earlier-predecessor tie-break spec §4.5 requires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{Result, RoutingError};

use super::config::SolveConfig;
use super::cost::edge_cost_hours;
use super::environment::Environment;
use super::location::Location;
use super::route::Route;

/// Cooperative cancellation, checked at rank boundaries (spec §5).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Earliest arrival at `finish`, or the distinguished voyage-failed
/// outcome (spec §6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyTime {
    Arrived(DateTime<Utc>),
    VoyageFailed,
}

/// Output of a solve (spec §6): journey time, the full arrival surface
/// (seconds since epoch, `f64::INFINITY` where unreached), and the
/// reconstructed path.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub journey_time: JourneyTime,
    /// Row-major `[rank][width]`, seconds since epoch or +inf.
    pub arrival: Vec<f64>,
    pub path: Vec<Location>,
    r: usize,
    w: usize,
}

impl SolveResult {
    pub fn arrival_at(&self, rank: usize, width: usize) -> f64 {
        self.arrival[rank * self.w + width]
    }

    pub fn ranks(&self) -> usize {
        self.r
    }

    pub fn width(&self) -> usize {
        self.w
    }
}

const SENTINEL_PRED: i64 = -1;

fn to_datetime(secs: f64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs.floor() as i64, 0).single().unwrap()
}

/// Runs the layered isochronal solve described in spec §4.5.
pub fn solve(route: &Route, environment: &Environment, config: &SolveConfig) -> Result<SolveResult> {
    if environment.mode() != config.interpolation {
        return Err(RoutingError::InconsistentInterpolationMode);
    }

    let departure_time = config.departure_time;
    let cancellation = config.cancellation.as_ref();

    let grid = route.grid();
    let r = grid.ranks();
    let w = grid.width();
    let t0 = departure_time.timestamp() as f64;

    let mut arrival = vec![f64::INFINITY; r * w];
    let mut pred = vec![SENTINEL_PRED; r * w];

    // Stage A: seed rank 0 from `start`.
    let seeds: Vec<(usize, Option<f64>)> = (0..w)
        .into_par_iter()
        .map(|k| {
            let cell = grid.cell(0, k);
            if cell.is_land {
                return (k, None);
            }
            let sample = environment.sample(&route.start, departure_time);
            let cost = edge_cost_hours(&route.start, &cell.location, &sample, &route.craft, 0.0);
            (k, cost.map(|hours| t0 + hours * 3600.0))
        })
        .collect();
    for (k, t) in seeds {
        if let Some(t) = t {
            arrival[k] = t;
        }
    }
    info!("seeded rank 0: {} of {} nodes reachable", arrival[..w].iter().filter(|v| v.is_finite()).count(), w);

    // Stage B: layered relaxation, rank by rank.
    for rank in 0..r.saturating_sub(1) {
        if let Some(token) = cancellation {
            if token.is_cancelled() {
                return Err(RoutingError::Cancelled { rank });
            }
        }

        let departures: Vec<usize> = (0..w).filter(|&k| arrival[rank * w + k].is_finite()).collect();

        let candidates: Vec<Vec<(usize, f64)>> = departures
            .par_iter()
            .map(|&dw| {
                let t_dep = arrival[rank * w + dw];
                let dep_cell = grid.cell(rank, dw);
                let dep_time = to_datetime(t_dep);
                let sample = environment.sample(&dep_cell.location, dep_time);
                let lifetime_hours = (t_dep - t0) / 3600.0;

                let mut local = Vec::new();
                for k in 0..w {
                    let dest_cell = grid.cell(rank + 1, k);
                    if dest_cell.is_land {
                        continue;
                    }
                    if let Some(hours) =
                        edge_cost_hours(&dep_cell.location, &dest_cell.location, &sample, &route.craft, lifetime_hours)
                    {
                        local.push((k, t_dep + hours * 3600.0));
                    }
                }
                local
            })
            .collect();

        // Sequential reduction, in increasing source-node order, so ties
        // deterministically keep the earlier-visited predecessor.
        for (i, &dw) in departures.iter().enumerate() {
            let src_index = (rank * w + dw) as i64;
            for &(k, t_cand) in &candidates[i] {
                let dst = (rank + 1) * w + k;
                if t_cand < arrival[dst] {
                    arrival[dst] = t_cand;
                    pred[dst] = src_index;
                }
            }
        }

        debug!(
            "relaxed rank {} -> {}: {} nodes reachable",
            rank,
            rank + 1,
            arrival[(rank + 1) * w..(rank + 2) * w].iter().filter(|v| v.is_finite()).count()
        );
    }

    if let Some(token) = cancellation {
        if token.is_cancelled() {
            return Err(RoutingError::Cancelled { rank: r - 1 });
        }
    }

    // Stage C: terminal relaxation into `finish`.
    let last_rank = r - 1;
    let terminal: Vec<(usize, Option<f64>)> = (0..w)
        .into_par_iter()
        .filter(|&k| arrival[last_rank * w + k].is_finite())
        .map(|k| {
            let t_dep = arrival[last_rank * w + k];
            let dep_cell = grid.cell(last_rank, k);
            let dep_time = to_datetime(t_dep);
            let sample = environment.sample(&dep_cell.location, dep_time);
            let lifetime_hours = (t_dep - t0) / 3600.0;
            let cost = edge_cost_hours(&dep_cell.location, &route.finish, &sample, &route.craft, lifetime_hours);
            (k, cost.map(|hours| t_dep + hours * 3600.0))
        })
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (k, t_fin) in terminal {
        if let Some(t_fin) = t_fin {
            if best.is_none_or(|(_, b)| t_fin < b) {
                best = Some((k, t_fin));
            }
        }
    }

    let (journey_time, path) = match best {
        Some((w_star, t_fin)) => {
            let mut chain_indices = Vec::with_capacity(r + 2);
            let mut current = (last_rank * w + w_star) as i64;
            loop {
                chain_indices.push(current);
                let p = pred[current as usize];
                if p == SENTINEL_PRED {
                    break;
                }
                current = p;
            }
            chain_indices.reverse();

            let mut path = Vec::with_capacity(chain_indices.len() + 2);
            path.push(route.start);
            for idx in chain_indices {
                let rank = idx as usize / w;
                let width = idx as usize % w;
                path.push(grid.cell(rank, width).location);
            }
            path.push(route.finish);

            (JourneyTime::Arrived(to_datetime(t_fin)), path)
        }
        None => {
            warn!("voyage failed: no finite arrival at finish");
            (JourneyTime::VoyageFailed, Vec::new())
        }
    };

    Ok(SolveResult { journey_time, arrival, path, r, w })
}

/// Total elapsed voyage duration, or `None` if the voyage failed.
pub fn journey_duration(result: &SolveResult, departure_time: DateTime<Utc>) -> Option<Duration> {
    match result.journey_time {
        JourneyTime::Arrived(t) => Some(t - departure_time),
        JourneyTime::VoyageFailed => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::craft::Craft;
    use crate::engine::failure::FailureModel;
    use crate::engine::field::{EnvironmentField, InterpolationMode};
    use crate::engine::mask::RoaringLandMask;
    use crate::engine::polar::Polar;
    use chrono::TimeZone;

    fn config_at(r: usize, w: usize, t: DateTime<Utc>) -> SolveConfig {
        SolveConfig::new(r, w, 10_000.0, t, InterpolationMode::Nearest).unwrap()
    }

    fn uniform_env(tws: f64, twd: f64, wh: f64) -> Environment {
        let lon = vec![-180.0, 180.0];
        let lat = vec![-90.0, 90.0];
        let time = vec![0, 1_000_000_000];
        let field = |v: f64| {
            EnvironmentField::new(lon.clone(), lat.clone(), time.clone(), vec![v; 8], InterpolationMode::Nearest).unwrap()
        };
        Environment::new(field(tws), field(twd), field(180.0), field(wh), field(8.0)).unwrap()
    }

    fn fast_craft(tolerance: f64) -> Craft {
        let twa = vec![0.0, 90.0, 180.0];
        let tws = vec![0.0, 40.0];
        let speed = vec![vec![8.0, 8.0], vec![8.0, 8.0], vec![8.0, 8.0]];
        let polar = Polar::new(twa, tws, speed, 1.0).unwrap();
        Craft::new(polar, FailureModel::default(), tolerance).unwrap()
    }

    #[test]
    fn reaches_finish_with_uniform_favourable_wind() {
        let start = Location::new(-2.37, 50.256);
        let finish = Location::new(-4.0, 50.256);
        let oracle = RoaringLandMask::empty();
        let craft = fast_craft(1.0);
        let route = Route::new(start, finish, 6, 5, 10_000.0, craft, &oracle).unwrap();
        // Wind from the east (90deg) pushes the boat west, toward finish.
        let env = uniform_env(15.0, 90.0, 0.0);
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let config = config_at(6, 5, t0);

        let result = solve(&route, &env, &config).unwrap();
        assert!(matches!(result.journey_time, JourneyTime::Arrived(_)));
        assert!(result.path.len() >= 2);
        assert_eq!(*result.path.first().unwrap(), start);
        assert_eq!(*result.path.last().unwrap(), finish);
    }

    #[test]
    fn arrival_is_monotone_along_the_predecessor_chain() {
        let start = Location::new(-2.37, 50.256);
        let finish = Location::new(-4.0, 50.256);
        let oracle = RoaringLandMask::empty();
        let craft = fast_craft(1.0);
        let route = Route::new(start, finish, 6, 5, 10_000.0, craft, &oracle).unwrap();
        let env = uniform_env(15.0, 90.0, 0.0);
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let config = config_at(6, 5, t0);

        let result = solve(&route, &env, &config).unwrap();
        // invariant 1: arrival only increases rank over rank.
        for rank in 1..result.ranks() {
            for width in 0..result.width() {
                let t = result.arrival_at(rank, width);
                if t.is_finite() {
                    assert!(result.arrival[(rank - 1) * result.width()..rank * result.width()]
                        .iter()
                        .any(|&prev| prev <= t));
                }
            }
        }
    }

    #[test]
    fn zero_tolerance_with_hazardous_wind_fails_the_voyage() {
        let start = Location::new(-2.37, 50.256);
        let finish = Location::new(-4.0, 50.256);
        let oracle = RoaringLandMask::empty();
        let craft = fast_craft(0.0);
        let route = Route::new(start, finish, 4, 4, 10_000.0, craft, &oracle).unwrap();
        // Severe wind speed (40kn, above the 25kn TWS_hi threshold) everywhere.
        let env = uniform_env(40.0, 90.0, 0.0);
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let config = config_at(4, 4, t0);

        let result = solve(&route, &env, &config).unwrap();
        assert_eq!(result.journey_time, JourneyTime::VoyageFailed);
        assert!(result.path.is_empty());
    }

    #[test]
    fn cancellation_stops_the_solve_early() {
        let start = Location::new(-2.37, 50.256);
        let finish = Location::new(-4.0, 50.256);
        let oracle = RoaringLandMask::empty();
        let craft = fast_craft(1.0);
        let route = Route::new(start, finish, 6, 5, 10_000.0, craft, &oracle).unwrap();
        let env = uniform_env(15.0, 90.0, 0.0);
        let t0 = Utc.timestamp_opt(0, 0).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let config = config_at(6, 5, t0).with_cancellation(token);
        let result = solve(&route, &env, &config);
        assert!(matches!(result, Err(RoutingError::Cancelled { .. })));
    }

    #[test]
    fn rejects_a_config_whose_interpolation_mode_disagrees_with_the_environment() {
        let start = Location::new(-2.37, 50.256);
        let finish = Location::new(-4.0, 50.256);
        let oracle = RoaringLandMask::empty();
        let craft = fast_craft(1.0);
        let route = Route::new(start, finish, 6, 5, 10_000.0, craft, &oracle).unwrap();
        let env = uniform_env(15.0, 90.0, 0.0); // built with InterpolationMode::Nearest
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let config = SolveConfig::new(6, 5, 10_000.0, t0, InterpolationMode::Trilinear).unwrap();

        let result = solve(&route, &env, &config);
        assert!(matches!(result, Err(RoutingError::InconsistentInterpolationMode)));
    }
}
