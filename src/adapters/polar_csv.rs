//! Polar table CSV loader, grounded in the teacher's
//! `parsers::polars::PolarData::load_from_csv`, generalized to return
//! `Result` instead of panicking on malformed input.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::engine::polar::Polar;
use crate::error::{Result, RoutingError};

/// Loads a polar table from a CSV shaped like the teacher's format: a
/// header row `twa/tws, <tws_0>, <tws_1>, ...` followed by one row per
/// TWA with the boat speed at each TWS.
pub fn load_polar_csv<P: AsRef<Path>>(path: P, perf_factor: f64) -> Result<Polar> {
    let path = path.as_ref();
    info!("loading polar table from {}", path.display());

    let file = File::open(path).map_err(|source| RoutingError::AssetLoad {
        path: path.display().to_string(),
        source,
    })?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| RoutingError::MalformedTable("polar CSV is empty".into()))?
        .map_err(|source| RoutingError::AssetLoad { path: path.display().to_string(), source })?;
    let tws: Vec<f64> = header
        .split(',')
        .skip(1)
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| RoutingError::MalformedTable(format!("bad tws header value {v:?}")))
        })
        .collect::<Result<_>>()?;

    let mut twa = Vec::new();
    let mut speed = Vec::new();
    for line in lines {
        let line = line.map_err(|source| RoutingError::AssetLoad { path: path.display().to_string(), source })?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split(',');
        let twa_val: f64 = parts
            .next()
            .ok_or_else(|| RoutingError::MalformedTable("row missing twa column".into()))?
            .trim()
            .parse()
            .map_err(|_| RoutingError::MalformedTable(format!("bad twa value in row {line:?}")))?;
        twa.push(twa_val);

        let row: Vec<f64> = parts
            .map(|v| {
                v.trim()
                    .parse()
                    .map_err(|_| RoutingError::MalformedTable(format!("bad speed value in row {line:?}")))
            })
            .collect::<Result<_>>()?;
        speed.push(row);
    }

    Polar::new(twa, tws, speed, perf_factor)
}
