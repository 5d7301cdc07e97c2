//! Coastline oracle (spec §6 external interface) and its default
//! roaring-bitmap-backed implementation, grounded in the teacher's
//! `engine::mask::LandMask`.

use roaring::RoaringTreemap;

use super::location::Location;

/// 1/240 degree resolution grid, matching the teacher's GSHHG tilemap.
pub const NX: u64 = 86400;
pub const NY: u64 = 43200;

/// A `is_land(lon, lat) -> bool` predicate (spec §6).
pub trait CoastlineOracle {
    fn is_land(&self, loc: &Location) -> bool;
}

/// Bitmap-backed land mask: one bit per 1/240-degree cell.
#[derive(Debug, Clone, Default)]
pub struct RoaringLandMask {
    mask: RoaringTreemap,
}

impl RoaringLandMask {
    pub fn empty() -> Self {
        Self { mask: RoaringTreemap::new() }
    }

    pub(crate) fn from_bitmap(mask: RoaringTreemap) -> Self {
        Self { mask }
    }

    fn coords_to_indices(lon: f64, lat: f64) -> (u64, u64) {
        let x = (lon * 240.0 + 43200.0) as u64;
        let y = (lat * 240.0 + 21600.0) as u64;
        (x.clamp(0, NX - 1), y.clamp(0, NY - 1))
    }

    /// Marks a rectangular box as land. Primarily for tests and for
    /// synthesizing simple coastlines without a real tilemap asset.
    pub fn add_land_box(&mut self, min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) {
        let (min_x, min_y) = Self::coords_to_indices(min_lon, min_lat);
        let (max_x, max_y) = Self::coords_to_indices(max_lon, max_lat);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.mask.insert(y * NX + x);
            }
        }
    }
}

impl CoastlineOracle for RoaringLandMask {
    fn is_land(&self, loc: &Location) -> bool {
        let (x, y) = Self::coords_to_indices(loc.lon, loc.lat);
        if y >= NY {
            return false;
        }
        self.mask.contains(y * NX + x)
    }
}
