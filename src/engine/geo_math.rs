//! Great-circle math shared by the grid builder and the cost function.
//!
//! Grounded in the teacher's `IsochroneRouter::calculate_bearing` /
//! `calculate_distance` / `calculate_destination`, generalized to return
//! nautical miles (the unit the cost function needs) rather than meters.

use super::location::Location;

const EARTH_RADIUS_KM: f64 = 6371.0;
const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// km -> nm conversion factor (spec §4.4).
pub const KM_TO_NM: f64 = 0.5399565;

/// Great-circle distance between two points, in nautical miles.
pub fn distance_nm(from: &Location, to: &Location) -> f64 {
    distance_km(from, to) * KM_TO_NM
}

fn distance_km(from: &Location, to: &Location) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = (to.lat - from.lat).to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Initial bearing (degrees, 0 = North, clockwise) from `from` to `to`.
pub fn bearing_deg(from: &Location, to: &Location) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let deg = y.atan2(x).to_degrees();
    (deg + 360.0) % 360.0
}

/// Destination point, `distance_m` meters along `bearing_deg` from `from`.
pub fn destination(from: &Location, distance_m: f64, bearing_deg: f64) -> Location {
    let angular_dist = distance_m / EARTH_RADIUS_M;
    let bearing_rad = bearing_deg.to_radians();

    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();

    let lat2 =
        (lat1.sin() * angular_dist.cos() + lat1.cos() * angular_dist.sin() * bearing_rad.cos())
            .asin();
    let lon2 = lon1
        + (bearing_rad.sin() * angular_dist.sin() * lat1.cos())
            .atan2(angular_dist.cos() - lat1.sin() * lat2.sin());

    Location::new(normalize_lon(lon2.to_degrees()), lat2.to_degrees())
}

/// Normalizes a longitude to (-180, 180], handling antimeridian wraparound
/// (spec §4.1 edge case).
pub fn normalize_lon(lon: f64) -> f64 {
    let mut l = lon;
    while l <= -180.0 {
        l += 360.0;
    }
    while l > 180.0 {
        l -= 360.0;
    }
    l
}

/// The signed difference `a - b` folded into (-180, 180], used to compute
/// relative wind/wave angles without discontinuities at the wrap point.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut d = (a - b) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_reference_pair() {
        // S4: Memphis-area to San Diego-area.
        let from = Location::new(-88.67, 36.12);
        let to = Location::new(-118.40, 33.94);
        let dist = distance_nm(&from, &to);
        let brg = bearing_deg(&from, &to);
        assert!((dist - 1462.22).abs() / 1462.22 < 0.01, "dist={dist}");
        assert!((brg - 276.33).abs() / 276.33 < 0.01, "bearing={brg}");
    }

    #[test]
    fn destination_round_trips_distance() {
        let start = Location::new(-2.37, 50.256);
        let dest = destination(&start, 100_000.0, 90.0);
        let measured_m = distance_nm(&start, &dest) / KM_TO_NM * 1000.0;
        assert!((measured_m - 100_000.0).abs() < 50.0);
    }

    #[test]
    fn normalize_lon_wraps_antimeridian() {
        assert!((normalize_lon(181.0) - (-179.0)).abs() < 1e-9);
        assert!((normalize_lon(-181.0) - 179.0).abs() < 1e-9);
        assert_eq!(normalize_lon(180.0), 180.0);
    }

    #[test]
    fn angle_diff_picks_shortest_signed_path() {
        assert!((angle_diff(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((angle_diff(350.0, 10.0) - (-20.0)).abs() < 1e-9);
    }
}
