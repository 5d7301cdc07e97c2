//! Compressed GSHHG land-mask loader, grounded in the teacher's
//! `engine::mask::LandMask::load`, generalized to return `Result`
//! instead of panicking on a missing or corrupt asset.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use roaring::RoaringTreemap;
use xz2::read::XzDecoder;

use crate::engine::mask::RoaringLandMask;
use crate::error::{Result, RoutingError};

/// Loads a land mask from an xz-compressed `RoaringTreemap` dump, the
/// same asset format the teacher ships under `assets/gshhg_mask.tbmap.xz`.
pub fn load_land_mask<P: AsRef<Path>>(path: P) -> Result<RoaringLandMask> {
    let path = path.as_ref();
    info!("loading land mask from {}", path.display());

    let file = File::open(path).map_err(|source| RoutingError::AssetLoad {
        path: path.display().to_string(),
        source,
    })?;
    let decoder = XzDecoder::new(BufReader::new(file));
    let mask = RoaringTreemap::deserialize_from(decoder).map_err(|source| RoutingError::AssetLoad {
        path: path.display().to_string(),
        source,
    })?;

    info!("land mask loaded");
    Ok(RoaringLandMask::from_bitmap(mask))
}
